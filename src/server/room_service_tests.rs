use super::*;
use crate::protocol::RoomId;
use proptest::prelude::*;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

fn create_test_server() -> Arc<SignalingServer> {
    SignalingServer::new(ServerConfig::default(), ProtocolConfig::default(), &[])
}

fn connect(server: &SignalingServer) -> (ConnectionId, mpsc::Receiver<Arc<ServerMessage>>) {
    let (sender, receiver) = mpsc::channel(16);
    let connection_id = Uuid::new_v4();
    server.connect_client(connection_id, sender);
    (connection_id, receiver)
}

fn drain(receiver: &mut mpsc::Receiver<Arc<ServerMessage>>) -> Vec<ServerMessage> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push((*event).clone());
    }
    events
}

fn room(id: &str) -> RoomId {
    RoomId::from(id)
}

#[tokio::test]
async fn create_room_acknowledges_requester() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);

    server.handle_create_room(&a, room("ABC123"));

    let ack = timeout(Duration::from_secs(1), rx_a.recv())
        .await
        .expect("channel still open")
        .expect("room created message present");
    assert_eq!(*ack, ServerMessage::RoomCreated(room("ABC123")));
    assert_eq!(server.get_client_room(&a), Some(room("ABC123")));
    assert_eq!(server.room_members(&room("ABC123")), vec![a]);
}

#[test]
fn second_create_fails_and_keeps_original_creator() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_create_room(&b, room("r"));

    assert_eq!(drain(&mut rx_a), vec![ServerMessage::RoomCreated(room("r"))]);
    assert_eq!(
        drain(&mut rx_b),
        vec![ServerMessage::error(
            ErrorCode::RoomAlreadyExists,
            "Room already exists"
        )]
    );
    assert_eq!(server.room_members(&room("r")), vec![a]);
    assert_eq!(server.get_client_room(&b), None);
}

#[test]
fn join_missing_room_reports_not_found_without_mutation() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);

    server.handle_join_room(&a, room("ghost"));

    assert_eq!(
        drain(&mut rx_a),
        vec![ServerMessage::error(ErrorCode::RoomNotFound, "Room does not exist")]
    );
    assert!(!server.room_exists(&room("ghost")));
    assert_eq!(server.room_count(), 0);
    assert_eq!(server.metrics.snapshot().room_join_not_found, 1);
}

#[test]
fn join_acknowledges_joiner_and_notifies_creator() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    drain(&mut rx_a);
    server.handle_join_room(&b, room("r"));

    assert_eq!(drain(&mut rx_b), vec![ServerMessage::RoomJoined(room("r"))]);
    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserConnected]);
    assert_eq!(server.room_members(&room("r")), vec![a, b]);
    assert_eq!(server.get_client_room(&b), Some(room("r")));
}

#[test]
fn third_join_gets_room_full_and_changes_nothing() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);
    let (c, mut rx_c) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_join_room(&b, room("r"));
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.handle_join_room(&c, room("r"));

    assert_eq!(drain(&mut rx_c), vec![ServerMessage::RoomFull]);
    assert!(drain(&mut rx_a).is_empty());
    assert!(drain(&mut rx_b).is_empty());
    assert_eq!(server.room_member_count(&room("r")), 2);
    assert_eq!(server.get_client_room(&c), None);
}

#[test]
fn rejoining_own_room_repeats_ack_without_user_connected() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_join_room(&b, room("r"));
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.handle_join_room(&b, room("r"));

    assert_eq!(drain(&mut rx_b), vec![ServerMessage::RoomJoined(room("r"))]);
    assert!(drain(&mut rx_a).is_empty());
    assert_eq!(server.room_members(&room("r")), vec![a, b]);
}

#[test]
fn disconnect_notifies_peer_and_last_leave_deletes_room() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, _rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_join_room(&b, room("r"));
    drain(&mut rx_a);

    server.unregister_client(&b);
    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserDisconnected]);
    assert_eq!(server.room_members(&room("r")), vec![a]);

    server.handle_leave_room(&a, room("r"));
    assert!(!server.room_exists(&room("r")));
    assert_eq!(server.get_client_room(&a), None);

    let snapshot = server.metrics.snapshot();
    assert_eq!(snapshot.rooms_created, 1);
    assert_eq!(snapshot.rooms_deleted, 1);
    assert_eq!(snapshot.active_rooms, 0);
}

#[test]
fn deleted_room_can_be_recreated() {
    let server = create_test_server();
    let (a, _rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.unregister_client(&a);
    assert!(!server.room_exists(&room("r")));

    server.handle_create_room(&b, room("r"));
    assert_eq!(drain(&mut rx_b), vec![ServerMessage::RoomCreated(room("r"))]);
    assert_eq!(server.room_members(&room("r")), vec![b]);
}

#[test]
fn duplicate_unregister_notifies_peer_once() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, _rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_join_room(&b, room("r"));
    drain(&mut rx_a);

    server.unregister_client(&b);
    server.unregister_client(&b);
    server.disconnect_client(&b);

    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserDisconnected]);
    assert_eq!(server.connection_count(), 1);
    assert_eq!(server.metrics.snapshot().disconnections, 1);
}

#[test]
fn leaving_a_room_not_joined_is_a_no_op() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("r"));
    server.handle_create_room(&b, room("other"));
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.handle_leave_room(&b, room("r"));
    server.handle_leave_room(&b, room("missing"));

    assert!(drain(&mut rx_a).is_empty());
    assert_eq!(server.room_members(&room("r")), vec![a]);
    assert_eq!(server.get_client_room(&b), Some(room("other")));
}

#[test]
fn explicit_leave_notifies_remaining_peer_and_frees_the_seat() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("pair"));
    server.handle_join_room(&b, room("pair"));
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.handle_leave_room(&b, room("pair"));

    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserDisconnected]);
    assert!(drain(&mut rx_b).is_empty());
    assert!(server.room_exists(&room("pair")));
    assert_eq!(server.room_members(&room("pair")), vec![a]);
    assert_eq!(server.get_client_room(&b), None);
    assert_eq!(server.get_client_room(&a), Some(room("pair")));

    server.handle_join_room(&b, room("pair"));

    assert_eq!(drain(&mut rx_b), vec![ServerMessage::RoomJoined(room("pair"))]);
    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserConnected]);
    assert_eq!(server.room_members(&room("pair")), vec![a, b]);
}

#[test]
fn switching_rooms_leaves_previous_room() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);
    let (c, _rx_c) = connect(&server);

    server.handle_create_room(&a, room("first"));
    server.handle_join_room(&b, room("first"));
    server.handle_create_room(&c, room("second"));
    drain(&mut rx_a);
    drain(&mut rx_b);

    server.handle_join_room(&b, room("second"));

    assert_eq!(drain(&mut rx_b), vec![ServerMessage::RoomJoined(room("second"))]);
    assert_eq!(drain(&mut rx_a), vec![ServerMessage::UserDisconnected]);
    assert_eq!(server.room_members(&room("first")), vec![a]);
    assert_eq!(server.room_members(&room("second")), vec![c, b]);
    assert_eq!(server.get_client_room(&b), Some(room("second")));
}

#[test]
fn failed_join_keeps_current_room() {
    let server = create_test_server();
    let (a, _rx_a) = connect(&server);
    let (b, mut rx_b) = connect(&server);

    server.handle_create_room(&a, room("home"));
    server.handle_join_room(&a, room("ghost"));

    assert_eq!(server.get_client_room(&a), Some(room("home")));
    assert_eq!(server.room_members(&room("home")), vec![a]);
    assert!(drain(&mut rx_b).is_empty());
}

#[test]
fn membership_from_unregistered_connection_is_rolled_back() {
    let server = create_test_server();
    let (a, mut rx_a) = connect(&server);
    let gone = Uuid::new_v4();

    server.handle_create_room(&gone, room("orphan"));
    assert!(!server.room_exists(&room("orphan")));

    server.handle_create_room(&a, room("r"));
    drain(&mut rx_a);
    server.handle_join_room(&gone, room("r"));

    assert_eq!(server.room_members(&room("r")), vec![a]);
    assert!(drain(&mut rx_a).is_empty());
}

#[test]
fn register_client_enforces_per_ip_cap() {
    let config = ServerConfig {
        max_connections_per_ip: 1,
        ..ServerConfig::default()
    };
    let server = SignalingServer::new(config, ProtocolConfig::default(), &[]);
    let addr: SocketAddr = "127.0.0.1:48000".parse().unwrap();

    let (tx1, _rx1) = mpsc::channel(4);
    server
        .register_client(tx1, addr)
        .expect("first registration succeeds");

    let (tx2, _rx2) = mpsc::channel(4);
    let err = server
        .register_client(tx2, addr)
        .expect_err("second registration hits the cap");
    assert_eq!(err.error_code(), ErrorCode::TooManyConnections);
    assert_eq!(server.metrics.snapshot().connection_rejections, 1);
}

#[derive(Debug, Clone)]
enum Op {
    Create(usize, usize),
    Join(usize, usize),
    Leave(usize, usize),
    Disconnect(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize, 0..3usize).prop_map(|(c, r)| Op::Create(c, r)),
        (0..4usize, 0..3usize).prop_map(|(c, r)| Op::Join(c, r)),
        (0..4usize, 0..3usize).prop_map(|(c, r)| Op::Leave(c, r)),
        (0..4usize).prop_map(Op::Disconnect),
    ]
}

proptest! {
    #[test]
    fn associations_always_match_room_membership(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let server = create_test_server();
        let rooms: Vec<RoomId> = ["a", "b", "c"].into_iter().map(RoomId::from).collect();
        let mut slots: Vec<(ConnectionId, mpsc::Receiver<Arc<ServerMessage>>)> =
            (0..4).map(|_| connect(&server)).collect();

        for op in ops {
            match op {
                Op::Create(c, r) => server.handle_create_room(&slots[c].0, rooms[r].clone()),
                Op::Join(c, r) => server.handle_join_room(&slots[c].0, rooms[r].clone()),
                Op::Leave(c, r) => server.handle_leave_room(&slots[c].0, rooms[r].clone()),
                Op::Disconnect(c) => {
                    server.unregister_client(&slots[c].0);
                    slots[c] = connect(&server);
                }
            }
            for (_, receiver) in slots.iter_mut() {
                drain(receiver);
            }

            let mut member_of: HashMap<ConnectionId, RoomId> = HashMap::new();
            for (room_id, members) in server.room_table.snapshot() {
                prop_assert!(!members.is_empty());
                for member in members {
                    prop_assert!(server.has_client(&member), "stale member {member}");
                    prop_assert!(member_of.insert(member, room_id.clone()).is_none());
                }
            }
            for (connection_id, _) in &slots {
                prop_assert_eq!(
                    server.get_client_room(connection_id),
                    member_of.get(connection_id).cloned()
                );
            }
        }
    }
}
