//! ARP (RFC 826), Ethernet/IPv4 only: fixed 28-byte packet.

/// ARP hardware type for Ethernet.
pub const HTYPE_ETHERNET: u16 = 1;
/// ARP protocol type for IPv4.
pub const PTYPE_IPV4: u16 = 0x0800;
/// ARP operation: request.
pub const OP_REQUEST: u16 = 1;
/// ARP operation: reply.
pub const OP_REPLY: u16 = 2;

/// ARP packet size for Ethernet/IPv4.
pub const PACKET_LEN: usize = 28;

/// A parsed ARP packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpPacket {
    pub htype: u16,
    pub ptype: u16,
    pub hlen: u8,
    pub plen: u8,
    pub oper: u16,
    pub sender_mac: [u8; 6],
    pub sender_ip: [u8; 4],
    pub target_mac: [u8; 6],
    pub target_ip: [u8; 4],
}

impl ArpPacket {
    /// Parse an ARP packet. Rejects anything that isn't Ethernet/IPv4
    /// (`htype`/`ptype`/`hlen`/`plen` mismatched) — this stack never speaks
    /// any other hardware or protocol combination.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < PACKET_LEN {
            return None;
        }
        let htype = u16::from_be_bytes([data[0], data[1]]);
        let ptype = u16::from_be_bytes([data[2], data[3]]);
        let hlen = data[4];
        let plen = data[5];
        if htype != HTYPE_ETHERNET || ptype != PTYPE_IPV4 || hlen != 6 || plen != 4 {
            return None;
        }
        let oper = u16::from_be_bytes([data[6], data[7]]);
        let sender_mac = data[8..14].try_into().unwrap();
        let sender_ip = data[14..18].try_into().unwrap();
        let target_mac = data[18..24].try_into().unwrap();
        let target_ip = data[24..28].try_into().unwrap();

        Some(ArpPacket {
            htype,
            ptype,
            hlen,
            plen,
            oper,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        })
    }

    /// Serialise into `out`, returning the number of bytes written (always
    /// `PACKET_LEN`). `out` must be at least `PACKET_LEN` bytes long.
    pub fn serialise_into(&self, out: &mut [u8]) -> usize {
        assert!(out.len() >= PACKET_LEN, "output buffer too small for ARP packet");
        out[0..2].copy_from_slice(&self.htype.to_be_bytes());
        out[2..4].copy_from_slice(&self.ptype.to_be_bytes());
        out[4] = self.hlen;
        out[5] = self.plen;
        out[6..8].copy_from_slice(&self.oper.to_be_bytes());
        out[8..14].copy_from_slice(&self.sender_mac);
        out[14..18].copy_from_slice(&self.sender_ip);
        out[18..24].copy_from_slice(&self.target_mac);
        out[24..28].copy_from_slice(&self.target_ip);
        PACKET_LEN
    }

    /// Build an ARP request/reply in one step; convenience over
    /// constructing the struct fields by hand at call sites.
    pub fn new(
        oper: u16,
        sender_mac: [u8; 6],
        sender_ip: [u8; 4],
        target_mac: [u8; 6],
        target_ip: [u8; 4],
    ) -> Self {
        ArpPacket {
            htype: HTYPE_ETHERNET,
            ptype: PTYPE_IPV4,
            hlen: 6,
            plen: 4,
            oper,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        }
    }
}
