mod common;

use common::{ship, standard_fleet};
use fleet_arena::core::{encode_fleet, Orientation, Position, ShipKind, ShipLabel};
use fleet_arena::domain::{GameId, PlayerId};
use fleet_arena::protocol::AttackStatus;
use fleet_arena::session::{BattleSession, Outcome, Phase, Readiness, SessionError, SessionMode};
use rand::{rngs::SmallRng, SeedableRng};

fn players() -> (PlayerId, PlayerId) {
    (PlayerId::new("alice"), PlayerId::new("bob"))
}

/// Duel where both boards hold the same `ships`; returns the session and
/// `(attacker, defender)` for the first turn.
fn started_duel(
    ships: &[fleet_arena::core::ShipPlacement],
) -> (BattleSession, PlayerId, PlayerId) {
    let (a, b) = players();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut session = BattleSession::duel(GameId::new("g1"), a.clone(), b.clone());
    assert_eq!(
        session
            .add_encoded_fleet(&a, encode_fleet(ships).unwrap(), &mut rng)
            .unwrap(),
        Readiness::Waiting
    );
    let Readiness::Started { turn } = session
        .add_encoded_fleet(&b, encode_fleet(ships).unwrap(), &mut rng)
        .unwrap()
    else {
        panic!("duel should start once both fleets are in");
    };
    let defender = if turn == a { b } else { a };
    (session, turn, defender)
}

#[test]
fn single_huge_ship_sinks_after_four_hits() {
    let ships = vec![ship(0, 0, Orientation::Horizontal, ShipKind::Huge)];
    let (mut session, attacker, defender) = started_duel(&ships);

    let outcomes: Vec<Outcome> = (0..4)
        .map(|x| {
            session
                .resolve_attack(&attacker, Position::new(x, 0))
                .unwrap()
                .outcome
        })
        .collect();
    assert_eq!(
        outcomes,
        vec![Outcome::Shot, Outcome::Shot, Outcome::Shot, Outcome::Finished]
    );
    assert_eq!(
        session.phase(),
        &Phase::Finished {
            winner: attacker.clone()
        }
    );
    assert!(session.fleet(&defender).unwrap().all_sunk());
    assert!(*session.cancellation().borrow());
}

#[test]
fn kill_reports_every_cell_then_the_ring() {
    let ships = vec![
        ship(0, 0, Orientation::Horizontal, ShipKind::Medium),
        ship(9, 9, Orientation::Horizontal, ShipKind::Small),
    ];
    let (mut session, attacker, defender) = started_duel(&ships);

    session.resolve_attack(&attacker, Position::new(1, 0)).unwrap();
    let report = session.resolve_attack(&attacker, Position::new(0, 0)).unwrap();
    assert_eq!(report.outcome, Outcome::Killed);
    assert_eq!(report.turn, attacker);

    let killed: Vec<Position> = report
        .events
        .iter()
        .filter(|e| e.status == AttackStatus::Killed)
        .map(|e| e.position)
        .collect();
    assert_eq!(killed, vec![Position::new(0, 0), Position::new(1, 0)]);

    let ring: Vec<Position> = report
        .events
        .iter()
        .filter(|e| e.status == AttackStatus::Miss)
        .map(|e| e.position)
        .collect();
    assert_eq!(
        ring,
        vec![
            Position::new(2, 0),
            Position::new(0, 1),
            Position::new(1, 1),
            Position::new(2, 1),
        ]
    );
    let touched = session.touched(&defender).unwrap();
    for cell in ring {
        assert!(touched.contains(cell));
    }
    assert_eq!(touched.len(), 6);
}

#[test]
fn repeated_miss_passes_the_turn_once() {
    let (mut session, attacker, defender) = started_duel(&standard_fleet());

    let first = session.resolve_attack(&attacker, Position::new(5, 5)).unwrap();
    assert_eq!(first.outcome, Outcome::Miss);
    assert_eq!(first.turn, defender);
    assert_eq!(session.turn(), Some(&defender));

    assert_eq!(session.resolve_attack(&attacker, Position::new(5, 5)), None);
    assert_eq!(session.turn(), Some(&defender));
}

#[test]
fn sinking_one_ship_leaves_the_other_intact() {
    let ships = vec![
        ship(0, 0, Orientation::Horizontal, ShipKind::Small),
        ship(9, 9, Orientation::Horizontal, ShipKind::Small),
    ];
    let (mut session, attacker, defender) = started_duel(&ships);

    let report = session.resolve_attack(&attacker, Position::new(0, 0)).unwrap();
    assert_eq!(report.outcome, Outcome::Killed);
    let fleet = session.fleet(&defender).unwrap();
    let second = ShipLabel {
        kind: ShipKind::Small,
        ordinal: 2,
    };
    assert_eq!(fleet.hit_points(second), Some(1));

    let report = session.resolve_attack(&attacker, Position::new(9, 9)).unwrap();
    assert_eq!(report.outcome, Outcome::Finished);
    assert_eq!(report.winner(), Some(&attacker));
}

#[test]
fn re_hitting_a_damaged_cell_does_not_damage_again() {
    let ships = vec![ship(3, 3, Orientation::Vertical, ShipKind::Large)];
    let (mut session, attacker, defender) = started_duel(&ships);
    let label = ShipLabel {
        kind: ShipKind::Large,
        ordinal: 1,
    };

    session.resolve_attack(&attacker, Position::new(3, 3)).unwrap();
    let again = session.resolve_attack(&attacker, Position::new(3, 3)).unwrap();
    assert_eq!(again.outcome, Outcome::Shot);
    assert_eq!(session.fleet(&defender).unwrap().hit_points(label), Some(2));
}

#[test]
fn attacks_out_of_turn_or_off_board_change_nothing() {
    let (mut session, attacker, defender) = started_duel(&standard_fleet());

    assert_eq!(session.resolve_attack(&defender, Position::new(0, 0)), None);
    assert_eq!(session.resolve_attack(&attacker, Position::new(10, 0)), None);
    assert_eq!(session.resolve_attack(&PlayerId::new("mallory"), Position::new(0, 0)), None);
    assert!(session.touched(&defender).unwrap().is_empty());
    assert!(session.touched(&attacker).unwrap().is_empty());
    assert_eq!(session.turn(), Some(&attacker));
}

#[test]
fn attacks_before_start_are_ignored() {
    let (a, b) = players();
    let mut session = BattleSession::duel(GameId::new("g"), a.clone(), b);
    assert_eq!(session.resolve_attack(&a, Position::new(0, 0)), None);
    assert_eq!(session.phase(), &Phase::AwaitingFleets);
}

#[test]
fn fleet_submission_rules() {
    let (a, b) = players();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut session = BattleSession::duel(GameId::new("g"), a.clone(), b.clone());

    let mut bad = standard_fleet();
    bad.pop();
    assert!(matches!(
        session.add_fleet(&a, &bad, &mut rng),
        Err(SessionError::InvalidFleet(_))
    ));
    assert!(matches!(
        session.add_fleet(&PlayerId::new("eve"), &standard_fleet(), &mut rng),
        Err(SessionError::UnknownParticipant(_))
    ));
    assert_eq!(
        session.add_fleet(&a, &standard_fleet(), &mut rng).unwrap(),
        Readiness::Waiting
    );
    assert!(matches!(
        session.add_fleet(&a, &standard_fleet(), &mut rng),
        Err(SessionError::FleetAlreadySubmitted(_))
    ));
    assert!(matches!(
        session.add_fleet(&b, &standard_fleet(), &mut rng).unwrap(),
        Readiness::Started { .. }
    ));
    assert!(matches!(
        session.add_fleet(&b, &standard_fleet(), &mut rng),
        Err(SessionError::NotAcceptingFleets)
    ));
}

#[test]
fn human_opens_against_the_bot() {
    let human = PlayerId::new("solo");
    let mut rng = SmallRng::seed_from_u64(9);
    let bot_fleet = encode_fleet(&standard_fleet()).unwrap();
    let mut session = BattleSession::versus_bot(GameId::new("g"), human.clone(), bot_fleet);
    assert_eq!(session.mode(), SessionMode::VersusBot);
    assert!(session.is_bot(&PlayerId::bot()));
    assert!(!session.is_bot(&human));

    let readiness = session.add_fleet(&human, &standard_fleet(), &mut rng).unwrap();
    assert_eq!(readiness, Readiness::Started { turn: human });
}

#[test]
fn random_attack_hits_untouched_cells_only() {
    let (mut session, attacker, defender) = started_duel(&standard_fleet());
    let mut rng = SmallRng::seed_from_u64(11);
    let mut seen = std::collections::HashSet::new();

    while let Some(report) = session.resolve_random_attack(&attacker, &mut rng) {
        assert!(seen.insert(report.target), "{} fired twice", report.target);
        if report.outcome == Outcome::Miss {
            break;
        }
        if report.outcome == Outcome::Finished {
            break;
        }
    }
    assert!(!seen.is_empty());
    assert!(session.touched(&defender).unwrap().len() >= seen.len());
}

#[test]
fn leaving_hands_the_win_to_the_opponent() {
    let (mut session, attacker, defender) = started_duel(&standard_fleet());
    assert_eq!(
        session.finish_when_participant_leaves(&attacker),
        Some(defender.clone())
    );
    assert_eq!(session.phase(), &Phase::Finished { winner: defender });
    assert_eq!(session.finish_when_participant_leaves(&attacker), None);
    assert_eq!(session.resolve_attack(&attacker, Position::new(5, 5)), None);
}
