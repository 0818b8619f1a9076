use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc_signal_relay::config::ProtocolConfig;
use webrtc_signal_relay::protocol::{parse_client_message, ClientMessage, RoomId, ServerMessage};
use webrtc_signal_relay::server::{ServerConfig, SignalingServer};

fn bench_room_cycle(c: &mut Criterion) {
    let server = SignalingServer::new(ServerConfig::default(), ProtocolConfig::default(), &[]);
    let (tx_a, mut rx_a) = mpsc::channel::<Arc<ServerMessage>>(64);
    let (tx_b, mut rx_b) = mpsc::channel::<Arc<ServerMessage>>(64);
    let a = uuid::Uuid::new_v4();
    let b = uuid::Uuid::new_v4();
    server.connect_client(a, tx_a);
    server.connect_client(b, tx_b);
    let room_id = RoomId::from("BENCH1");
    let candidate = serde_json::json!({
        "candidate": "candidate:1 1 udp 2122260223 10.0.0.2 54321 typ host",
        "sdpMid": "0",
        "sdpMLineIndex": 0
    });

    c.bench_function("create_join_relay_leave", |bench| {
        bench.iter(|| {
            server.handle_create_room(&a, room_id.clone());
            server.handle_join_room(&b, room_id.clone());
            server.handle_client_message(
                &a,
                ClientMessage::IceCandidate {
                    room_id: room_id.clone(),
                    candidate: candidate.clone(),
                },
            );
            server.handle_leave_room(&b, room_id.clone());
            server.handle_leave_room(&a, room_id.clone());
            while rx_a.try_recv().is_ok() {}
            while rx_b.try_recv().is_ok() {}
        });
    });
}

fn bench_parse(c: &mut Criterion) {
    let config = ProtocolConfig::default();
    let frame = r#"{"type":"offer","data":{"roomId":"ABC123","offer":{"type":"offer","sdp":"v=0\r\no=- 46117 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\n"}}}"#;

    c.bench_function("parse_offer_frame", |bench| {
        bench.iter(|| black_box(parse_client_message(black_box(frame), &config)));
    });
}

criterion_group!(relay_cycle, bench_room_cycle, bench_parse);
criterion_main!(relay_cycle);
