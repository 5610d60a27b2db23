//! The packet demultiplexer (`spec.md` §4.C): classifies an inbound Ethernet
//! frame, answers ARP entirely in-kernel, and routes IPv4/UDP datagrams to
//! the connection bound to their destination port.
//!
//! `handle_packet` takes whatever `HostOps` handle it needs for `wakeup`
//! only — it never touches the driver directly. Frames this stack needs to
//! send back out (ARP replies) are appended to `out` rather than transmitted
//! inline, so the caller can hold `e1000::E1000::tx_enqueue` outside of this
//! function's borrow of the connection table.

use alloc::vec::Vec;

use crate::conn::ConnTable;
use crate::host::HostOps;
use crate::wire::{arp, ethernet, ipv4, udp};

/// Outbound frames this call produced, paired with whether the driver
/// should install TCP/IP checksum offload for them. ARP replies never need
/// offload.
pub type PendingFrame = (Vec<u8>, bool);

/// Handle one inbound frame. Acquires no lock itself — the caller is
/// expected to be holding `netlock` for the duration of this call, matching
/// `spec.md`'s "acquires netlock, ... releases netlock on exit".
pub fn handle_packet<H: HostOps>(
    host: &H,
    conns: &mut ConnTable,
    local_mac: [u8; 6],
    local_ip: [u8; 4],
    buf: &[u8],
    out: &mut Vec<PendingFrame>,
) {
    let frame = match ethernet::EthernetFrame::parse(buf) {
        Some(f) => f,
        None => return,
    };

    match frame.ethertype {
        ethernet::ETHERTYPE_ARP => handle_arp(host, conns, local_mac, local_ip, frame.payload, out),
        ethernet::ETHERTYPE_IPV4 => handle_ipv4(host, conns, local_ip, frame.payload),
        _ => {
            // IPv6 and anything else: dropped.
        }
    }
}

fn handle_arp<H: HostOps>(
    host: &H,
    conns: &mut ConnTable,
    local_mac: [u8; 6],
    local_ip: [u8; 4],
    payload: &[u8],
    out: &mut Vec<PendingFrame>,
) {
    let pkt = match arp::ArpPacket::parse(payload) {
        Some(p) => p,
        None => return,
    };
    if pkt.target_ip != local_ip {
        return;
    }

    match pkt.oper {
        arp::OP_REPLY => {
            let woken = conns.apply_arp_reply(pkt.sender_ip, pkt.sender_mac);
            for slot in woken {
                host.wakeup(slot);
            }
        }
        arp::OP_REQUEST => {
            let reply = arp::ArpPacket::new(
                arp::OP_REPLY,
                local_mac,
                local_ip,
                pkt.sender_mac,
                pkt.sender_ip,
            );
            let mut arp_buf = [0u8; arp::PACKET_LEN];
            reply.serialise_into(&mut arp_buf);

            let mut frame = alloc::vec![0u8; ethernet::HEADER_LEN + arp::PACKET_LEN];
            ethernet::EthernetFrame::serialise_into(
                &pkt.sender_mac,
                &local_mac,
                ethernet::ETHERTYPE_ARP,
                &arp_buf,
                &mut frame,
            );
            out.push((frame, false));
        }
        _ => {}
    }
}

fn handle_ipv4<H: HostOps>(host: &H, conns: &mut ConnTable, local_ip: [u8; 4], payload: &[u8]) {
    let pkt = match ipv4::Ipv4Packet::parse(payload) {
        Some(p) => p,
        None => return,
    };
    if pkt.dst_ip != local_ip {
        return;
    }
    if pkt.protocol != ipv4::PROTO_UDP {
        return;
    }

    let dgram = match udp::UdpDatagram::parse(pkt.payload) {
        Some(d) => d,
        None => return,
    };

    if let Some(slot) = conns.deliver_udp(dgram.dst_port, dgram.payload) {
        host.wakeup(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StdHost;

    const LOCAL_MAC: [u8; 6] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];
    const LOCAL_IP: [u8; 4] = [10, 0, 0, 2];

    fn build_arp_request(sha: [u8; 6], spa: [u8; 4], tpa: [u8; 4]) -> Vec<u8> {
        let pkt = arp::ArpPacket::new(arp::OP_REQUEST, sha, spa, [0; 6], tpa);
        let mut arp_buf = [0u8; arp::PACKET_LEN];
        pkt.serialise_into(&mut arp_buf);
        let mut frame = alloc::vec![0u8; ethernet::HEADER_LEN + arp::PACKET_LEN];
        ethernet::EthernetFrame::serialise_into(
            &LOCAL_MAC,
            &sha,
            ethernet::ETHERTYPE_ARP,
            &arp_buf,
            &mut frame,
        );
        frame
    }

    #[test]
    fn s1_arp_responder() {
        let host = StdHost::new();
        let mut conns = ConnTable::new();
        let mut out = Vec::new();
        let sha = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
        let frame = build_arp_request(sha, [10, 0, 0, 1], LOCAL_IP);

        handle_packet(&host, &mut conns, LOCAL_MAC, LOCAL_IP, &frame, &mut out);

        assert_eq!(out.len(), 1);
        let (reply, want_offload) = &out[0];
        assert!(!want_offload);
        let eth = ethernet::EthernetFrame::parse(reply).unwrap();
        assert_eq!(eth.dst_mac, sha);
        assert_eq!(eth.src_mac, LOCAL_MAC);
        assert_eq!(eth.ethertype, ethernet::ETHERTYPE_ARP);
        let reply_arp = arp::ArpPacket::parse(eth.payload).unwrap();
        assert_eq!(reply_arp.oper, arp::OP_REPLY);
        assert_eq!(reply_arp.sender_mac, LOCAL_MAC);
        assert_eq!(reply_arp.sender_ip, LOCAL_IP);
        assert_eq!(reply_arp.target_mac, sha);
        assert_eq!(reply_arp.target_ip, [10, 0, 0, 1]);
    }

    #[test]
    fn s2_arp_for_foreign_ip_is_silent() {
        let host = StdHost::new();
        let mut conns = ConnTable::new();
        let mut out = Vec::new();
        let frame = build_arp_request([0xaa; 6], [10, 0, 0, 1], [10, 0, 0, 3]);

        handle_packet(&host, &mut conns, LOCAL_MAC, LOCAL_IP, &frame, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn s5_udp_receive_delivers_to_matching_connection() {
        let host = StdHost::new();
        let mut conns = ConnTable::new();
        let (slot, _gen) = conns.alloc_slot(&host, [10, 0, 0, 1], 4444).unwrap();
        let port = conns.local_port(slot).unwrap();
        assert_eq!(port, 3000);

        let mut udp_buf = [0u8; udp::HEADER_LEN + 5];
        udp::UdpDatagram::serialise_into(4444, port, b"world", &mut udp_buf);
        let mut ip_buf = alloc::vec![0u8; ipv4::HEADER_LEN + udp_buf.len()];
        ipv4::Ipv4Packet::serialise_into(&[10, 0, 0, 1], &LOCAL_IP, ipv4::PROTO_UDP, &udp_buf, &mut ip_buf);
        let mut frame = alloc::vec![0u8; ethernet::HEADER_LEN + ip_buf.len()];
        ethernet::EthernetFrame::serialise_into(&LOCAL_MAC, &[0x11; 6], ethernet::ETHERTYPE_IPV4, &ip_buf, &mut frame);

        let mut out = Vec::new();
        handle_packet(&host, &mut conns, LOCAL_MAC, LOCAL_IP, &frame, &mut out);
        assert!(out.is_empty());

        let mut dst = [0u8; 16];
        let n = conns.read(slot, &mut dst).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&dst[..5], b"world");
    }

    #[test]
    fn unknown_udp_port_is_dropped_without_panicking() {
        let host = StdHost::new();
        let mut conns = ConnTable::new();

        let mut udp_buf = [0u8; udp::HEADER_LEN + 2];
        udp::UdpDatagram::serialise_into(1, 9999, b"hi", &mut udp_buf);
        let mut ip_buf = alloc::vec![0u8; ipv4::HEADER_LEN + udp_buf.len()];
        ipv4::Ipv4Packet::serialise_into(&[10, 0, 0, 1], &LOCAL_IP, ipv4::PROTO_UDP, &udp_buf, &mut ip_buf);
        let mut frame = alloc::vec![0u8; ethernet::HEADER_LEN + ip_buf.len()];
        ethernet::EthernetFrame::serialise_into(&LOCAL_MAC, &[0x11; 6], ethernet::ETHERTYPE_IPV4, &ip_buf, &mut frame);

        let mut out = Vec::new();
        handle_packet(&host, &mut conns, LOCAL_MAC, LOCAL_IP, &frame, &mut out);
        assert!(out.is_empty());
    }
}
