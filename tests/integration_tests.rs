mod test_helpers;

use pong_relay_server::protocol::{ClientMessage, ServerMessage};
use test_helpers::{connect, create_test_server, TestClient};

fn game_start_number(client: &mut TestClient) -> (u8, String) {
    for message in client.drain() {
        if let ServerMessage::GameStart {
            player_number,
            game_id,
            controls,
        } = message.as_ref()
        {
            assert!(!controls.is_empty());
            return (*player_number, game_id.to_string());
        }
    }
    panic!("expected a gameStart message");
}

fn last_player_count(client: &mut TestClient) -> (usize, usize, usize) {
    let mut last = None;
    for message in client.drain() {
        if let ServerMessage::PlayerCount {
            total,
            active,
            waiting,
        } = message.as_ref()
        {
            last = Some((*total, *active, *waiting));
        }
    }
    last.expect("expected a playerCount message")
}

#[tokio::test]
async fn first_connect_gets_handshake_and_presence() {
    let server = create_test_server();
    let mut c1 = connect(&server);

    assert_eq!(*c1.recv(), ServerMessage::Connected);
    assert_eq!(
        *c1.recv(),
        ServerMessage::PlayerCount {
            total: 1,
            active: 0,
            waiting: 1
        }
    );
    assert_eq!(server.find_session(&c1.player_id), None);
}

#[tokio::test]
async fn matchmaking_is_fifo_and_exhaustive() {
    let server = create_test_server();
    let mut a = connect(&server);
    let mut b = connect(&server);
    let mut c = connect(&server);
    let mut d = connect(&server);

    let (a_number, a_game) = game_start_number(&mut a);
    let (b_number, b_game) = game_start_number(&mut b);
    let (c_number, c_game) = game_start_number(&mut c);
    let (d_number, d_game) = game_start_number(&mut d);

    // Arrival order decides roles: earlier arrival of each pair is host.
    assert_eq!(a_number, 1);
    assert_eq!(b_number, 2);
    assert_eq!(c_number, 1);
    assert_eq!(d_number, 2);

    // A+B share a session, C+D share a different one.
    assert_eq!(a_game, b_game);
    assert_eq!(c_game, d_game);
    assert_ne!(a_game, c_game);

    assert_eq!(
        server.find_session(&a.player_id),
        server.find_session(&b.player_id)
    );
    assert_eq!(
        server.find_session(&c.player_id),
        server.find_session(&d.player_id)
    );
}

#[tokio::test]
async fn odd_client_out_keeps_waiting() {
    let server = create_test_server();
    let _a = connect(&server);
    let _b = connect(&server);
    let mut c = connect(&server);

    let (total, active, waiting) = last_player_count(&mut c);
    assert_eq!((total, active, waiting), (3, 2, 1));
    assert_eq!(server.find_session(&c.player_id), None);

    // No gameStart was queued for the odd client out.
    assert!(c
        .drain()
        .iter()
        .all(|m| !matches!(m.as_ref(), ServerMessage::GameStart { .. })));
}

#[tokio::test]
async fn unregister_is_idempotent() {
    let server = create_test_server();
    let c1 = connect(&server);
    let mut c2 = connect(&server);
    let _ = c2.drain();

    server.unregister_client(&c1.player_id);
    let after_first = c2.drain().len();
    assert!(after_first > 0, "peer observes the first unregister");

    // Second unregister of the same id: no observable effect.
    server.unregister_client(&c1.player_id);
    assert!(c2.drain().is_empty());
}

#[tokio::test]
async fn peer_disconnect_notifies_exactly_once_and_kills_relay() {
    let server = create_test_server();
    let host = connect(&server);
    let mut guest = connect(&server);
    let _ = guest.drain();

    server.unregister_client(&host.player_id);

    let messages = guest.drain();
    let disconnects = messages
        .iter()
        .filter(|m| matches!(m.as_ref(), ServerMessage::PlayerDisconnected))
        .count();
    assert_eq!(disconnects, 1);

    // Torn-down session: guest is neither active nor re-queued.
    let counts = messages
        .iter()
        .rev()
        .find_map(|m| match m.as_ref() {
            ServerMessage::PlayerCount {
                total,
                active,
                waiting,
            } => Some((*total, *active, *waiting)),
            _ => None,
        })
        .expect("presence update after teardown");
    assert_eq!(counts, (1, 0, 0));

    // Subsequent relay attempts hit the no-session drop path.
    let drops_before = server.metrics().snapshot().relay_drops;
    server.handle_client_message(&guest.player_id, ClientMessage::PaddleMove { y: 50.0 });
    assert!(guest.drain().is_empty());
    assert_eq!(server.metrics().snapshot().relay_drops, drops_before + 1);
}

#[tokio::test]
async fn orphaned_peer_is_not_requeued_ahead_of_later_arrivals() {
    let server = create_test_server();
    let host = connect(&server);
    let guest = connect(&server);
    let third = connect(&server);

    server.unregister_client(&host.player_id);

    // The orphaned guest must not pair with the waiting third client.
    assert_eq!(server.find_session(&guest.player_id), None);
    assert_eq!(server.find_session(&third.player_id), None);

    // A fresh arrival pairs with the third client, not the orphan.
    let fourth = connect(&server);
    assert_eq!(
        server.find_session(&third.player_id),
        server.find_session(&fourth.player_id)
    );
    assert!(server.find_session(&third.player_id).is_some());
    assert_eq!(server.find_session(&guest.player_id), None);
}

#[tokio::test]
async fn presence_totals_stay_consistent_through_churn() {
    let server = create_test_server();
    let mut clients = Vec::new();
    for _ in 0..5 {
        clients.push(connect(&server));
    }
    server.unregister_client(&clients[4].player_id);

    // The last observer still connected sees total == active + waiting.
    let (total, active, waiting) = last_player_count(&mut clients[3]);
    assert_eq!(total, active + waiting);
    assert_eq!((total, active, waiting), (4, 4, 0));
}

#[tokio::test]
async fn paddle_move_relays_verbatim_with_sender_number() {
    let server = create_test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);
    let _ = host.drain();
    let _ = guest.drain();

    server.handle_client_message(&host.player_id, ClientMessage::PaddleMove { y: 120.0 });
    assert_eq!(
        *guest.recv(),
        ServerMessage::PaddleMove {
            player_number: 1,
            y: 120.0
        }
    );
    // Peer-addressed: the sender hears nothing back.
    assert!(host.drain().is_empty());

    server.handle_client_message(&guest.player_id, ClientMessage::PaddleMove { y: 33.5 });
    assert_eq!(
        *host.recv(),
        ServerMessage::PaddleMove {
            player_number: 2,
            y: 33.5
        }
    );
}

#[tokio::test]
async fn ball_and_score_updates_relay_verbatim() {
    let server = create_test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);
    let _ = host.drain();
    let _ = guest.drain();

    server.handle_client_message(
        &host.player_id,
        ClientMessage::BallUpdate { x: 400.5, y: 12.25 },
    );
    assert_eq!(*guest.recv(), ServerMessage::BallUpdate { x: 400.5, y: 12.25 });

    server.handle_client_message(
        &guest.player_id,
        ClientMessage::ScoreUpdate {
            player_number: 2,
            score: 7,
        },
    );
    assert_eq!(
        *host.recv(),
        ServerMessage::ScoreUpdate {
            player_number: 2,
            score: 7
        }
    );
}

#[tokio::test]
async fn game_over_concludes_session_and_stops_physics() {
    let server = create_test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);
    let _ = host.drain();
    let _ = guest.drain();

    server.handle_client_message(&host.player_id, ClientMessage::GameOver { winner: 1 });
    assert_eq!(*guest.recv(), ServerMessage::GameOver { winner: 1 });

    // Conclusion is idempotent; the repeat still relays verbatim.
    server.handle_client_message(&host.player_id, ClientMessage::GameOver { winner: 1 });
    assert_eq!(*guest.recv(), ServerMessage::GameOver { winner: 1 });
    assert_eq!(server.metrics().snapshot().sessions_concluded, 1);

    // Physics for a concluded session is dropped.
    server.handle_client_message(&host.player_id, ClientMessage::PaddleMove { y: 10.0 });
    server.handle_client_message(&host.player_id, ClientMessage::BallUpdate { x: 1.0, y: 2.0 });
    assert!(guest.drain().is_empty());

    // The session still exists until a member disconnects.
    assert!(server.find_session(&host.player_id).is_some());
    server.unregister_client(&guest.player_id);
    assert!(server.find_session(&host.player_id).is_some());
    server.unregister_client(&host.player_id);
    assert_eq!(server.find_session(&host.player_id), None);
}

#[tokio::test]
async fn relay_from_queued_client_drops_silently() {
    let server = create_test_server();
    let mut c1 = connect(&server);
    let _ = c1.drain();

    server.handle_client_message(&c1.player_id, ClientMessage::PaddleMove { y: 5.0 });
    server.handle_client_message(
        &c1.player_id,
        ClientMessage::GameOver { winner: 1 },
    );

    assert!(c1.drain().is_empty());
    assert_eq!(server.metrics().snapshot().relay_drops, 2);
    assert!(server.has_client(&c1.player_id));
}

/// The end-to-end scenario from the design notes, at the channel level.
#[tokio::test]
async fn full_match_lifecycle() {
    let server = create_test_server();

    let mut c1 = connect(&server);
    assert_eq!(*c1.recv(), ServerMessage::Connected);
    assert_eq!(
        *c1.recv(),
        ServerMessage::PlayerCount {
            total: 1,
            active: 0,
            waiting: 1
        }
    );

    let mut c2 = connect(&server);
    assert_eq!(*c2.recv(), ServerMessage::Connected);

    let (n1, game1) = game_start_number(&mut c1);
    let (n2, game2) = game_start_number(&mut c2);
    assert_eq!((n1, n2), (1, 2));
    assert_eq!(game1, game2);

    server.handle_client_message(&c1.player_id, ClientMessage::PaddleMove { y: 120.0 });
    assert_eq!(
        *c2.recv(),
        ServerMessage::PaddleMove {
            player_number: 1,
            y: 120.0
        }
    );

    server.unregister_client(&c1.player_id);
    let messages = c2.drain();
    assert!(messages
        .iter()
        .any(|m| matches!(m.as_ref(), ServerMessage::PlayerDisconnected)));
    assert!(messages.iter().any(|m| matches!(
        m.as_ref(),
        ServerMessage::PlayerCount {
            total: 1,
            active: 0,
            waiting: 0
        }
    )));
}
