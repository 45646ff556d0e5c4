use std::collections::HashMap;

use crate::protocol::WinnerView;

/// Win counts per user name.
#[derive(Debug, Default)]
pub struct Leaderboard {
    wins: HashMap<String, u32>,
}

impl Leaderboard {
    pub fn record(&mut self, name: &str) -> u32 {
        let wins = self.wins.entry(name.to_string()).or_insert(0);
        *wins += 1;
        *wins
    }

    /// Most wins first, ties by name.
    pub fn view(&self) -> Vec<WinnerView> {
        let mut view: Vec<WinnerView> = self
            .wins
            .iter()
            .map(|(name, &wins)| WinnerView {
                name: name.clone(),
                wins,
            })
            .collect();
        view.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
        view
    }
}
