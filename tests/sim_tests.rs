use fleet_arena::simulate_duel;

#[tokio::test]
async fn simulation_is_reproducible() -> anyhow::Result<()> {
    let first = simulate_duel(1234).await?;
    let second = simulate_duel(1234).await?;
    assert_eq!(first, second);
    assert!(first.winner == "player1" || first.winner == "player2");
    Ok(())
}

#[tokio::test]
async fn winner_hit_every_ship_cell() -> anyhow::Result<()> {
    for seed in 0..5 {
        let report = simulate_duel(seed).await?;
        let winner_shots = if report.winner == "player1" {
            report.shots.player1
        } else {
            report.shots.player2
        };
        // Every ship cell needs its own hit.
        assert!(winner_shots >= 20, "seed {}: {:?}", seed, report);
        assert!(report.shots.player1 <= 100 && report.shots.player2 <= 100);
    }
    Ok(())
}

#[test]
fn sim_binary_prints_json_summary() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_sim"))
        .arg("99")
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["seed"], 99);
    assert!(value["winner"].is_string());
    assert!(value["shots"]["player1"].is_u64());
}
