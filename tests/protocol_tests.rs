use fleet_arena::core::{Position, ShipKind};
use fleet_arena::domain::{GameId, PlayerId};
use fleet_arena::protocol::{
    AttackFeedback, AttackStatus, Envelope, Incoming, Outgoing, ProtocolError, RegReply, RoomUser,
    RoomView,
};

#[test]
fn envelope_payload_is_a_json_string() {
    let reply = Outgoing::Reg(RegReply {
        name: "alice".into(),
        index: "p1".into(),
        error: false,
        error_text: String::new(),
    });
    let envelope = reply.to_envelope().unwrap();
    assert_eq!(envelope.kind, "reg");
    assert_eq!(envelope.id, 0);

    let wire: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(wire["type"], "reg");
    assert!(wire["data"].is_string());
    let data: serde_json::Value = serde_json::from_str(wire["data"].as_str().unwrap()).unwrap();
    assert_eq!(data["errorText"], "");
    assert_eq!(data["index"], "p1");
}

#[test]
fn attack_request_accepts_numeric_ids() {
    let text = r#"{"type":"attack","data":"{\"gameId\":7,\"x\":3,\"y\":4,\"indexPlayer\":12}","id":0}"#;
    let envelope = Envelope::parse(text).unwrap();
    match Incoming::from_envelope(&envelope).unwrap() {
        Incoming::Attack(attack) => {
            assert_eq!(attack.game_id, GameId::new("7"));
            assert_eq!(attack.index_player, PlayerId::new("12"));
            assert_eq!((attack.x, attack.y), (3, 4));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn add_ships_payload_decodes_placements() {
    let data = r#"{"gameId":"g","indexPlayer":"p","ships":[{"position":{"x":0,"y":0},"direction":false,"length":4,"type":"huge"}]}"#;
    let envelope = Envelope {
        kind: "add_ships".into(),
        data: data.into(),
        id: 0,
    };
    let Incoming::AddShips(request) = Incoming::from_envelope(&envelope).unwrap() else {
        panic!("expected add_ships");
    };
    assert_eq!(request.ships.len(), 1);
    assert_eq!(request.ships[0].kind, ShipKind::Huge);
    assert_eq!(request.ships[0].position, Position::new(0, 0));
}

#[test]
fn requests_without_payload() {
    for (kind, expected) in [
        ("create_room", Incoming::CreateRoom),
        ("single_play", Incoming::SinglePlay),
    ] {
        let envelope = Envelope::parse(&format!(r#"{{"type":"{}","data":"","id":0}}"#, kind)).unwrap();
        assert_eq!(Incoming::from_envelope(&envelope).unwrap(), expected);
    }
    // `data` and `id` may be left out entirely.
    let bare = Envelope::parse(r#"{"type":"create_room"}"#).unwrap();
    assert_eq!(Incoming::from_envelope(&bare).unwrap(), Incoming::CreateRoom);
}

#[test]
fn random_attack_uses_camel_case_type() {
    let envelope = Envelope {
        kind: "randomAttack".into(),
        data: r#"{"gameId":"g","indexPlayer":"p"}"#.into(),
        id: 0,
    };
    assert!(matches!(
        Incoming::from_envelope(&envelope),
        Ok(Incoming::RandomAttack(_))
    ));
}

#[test]
fn malformed_input_is_reported() {
    assert!(matches!(
        Envelope::parse("not json"),
        Err(ProtocolError::InvalidEnvelope(_))
    ));

    let unknown = Envelope::parse(r#"{"type":"fly","data":"","id":0}"#).unwrap();
    assert!(matches!(
        Incoming::from_envelope(&unknown),
        Err(ProtocolError::UnknownType(kind)) if kind == "fly"
    ));

    let broken = Envelope {
        kind: "reg".into(),
        data: "{\"name\":".into(),
        id: 0,
    };
    assert!(matches!(
        Incoming::from_envelope(&broken),
        Err(ProtocolError::InvalidPayload { .. })
    ));
}

#[test]
fn attack_feedback_shape() {
    let message = Outgoing::Attack(AttackFeedback {
        status: AttackStatus::Killed,
        position: Position::new(1, 2),
        current_player: PlayerId::new("p"),
    });
    let envelope = message.to_envelope().unwrap();
    let data: serde_json::Value = serde_json::from_str(&envelope.data).unwrap();
    assert_eq!(
        data,
        serde_json::json!({
            "status": "killed",
            "position": {"x": 1, "y": 2},
            "currentPlayer": "p"
        })
    );
    assert_eq!(Outgoing::from_envelope(&envelope).unwrap(), message);
}

#[test]
fn room_list_shape() {
    let rooms = Outgoing::UpdateRoom(vec![RoomView {
        room_id: "r1".into(),
        room_users: vec![RoomUser {
            name: "alice".into(),
            index: PlayerId::new("p1"),
        }],
    }]);
    let envelope = rooms.to_envelope().unwrap();
    assert_eq!(envelope.kind, "update_room");
    let data: serde_json::Value = serde_json::from_str(&envelope.data).unwrap();
    assert_eq!(data[0]["roomId"], "r1");
    assert_eq!(data[0]["roomUsers"][0]["index"], "p1");
}
