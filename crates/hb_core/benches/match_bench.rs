use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hb_core::{
    simulate_fixtures, simulate_match, EngineConfig, Fixture, PlayerAttributes, PlayerData,
    PlayerPosition, Tactic, TeamData,
};

fn team(id: u32, name: &str) -> TeamData {
    let roles = [
        PlayerPosition::Goalkeeper,
        PlayerPosition::LeftWing,
        PlayerPosition::LeftBack,
        PlayerPosition::CentreBack,
        PlayerPosition::Pivot,
        PlayerPosition::RightBack,
        PlayerPosition::RightWing,
        PlayerPosition::Goalkeeper,
        PlayerPosition::CentreBack,
    ];
    let players: Vec<PlayerData> = roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            PlayerData::new(id * 100 + i as u32, format!("{name} {i}"), *role)
                .with_attributes(PlayerAttributes::uniform(10 + (i as u8 % 6)))
        })
        .collect();
    let lineup = players.iter().take(7).map(|p| p.id).collect();
    TeamData::new(id, name, players).with_lineup(lineup)
}

fn bench_short_match(c: &mut Criterion) {
    let home = team(1, "Home");
    let away = team(2, "Away");
    let config = EngineConfig::quick(300.0);

    c.bench_function("match_10min", |b| {
        b.iter_batched(
            || config.clone(),
            |cfg| {
                let result = simulate_match(&home, Tactic::default(), &away, Tactic::default(), cfg, black_box(42));
                black_box(result)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_fixture_day(c: &mut Criterion) {
    let config = EngineConfig::quick(120.0);
    let fixtures: Vec<Fixture> = (0..8)
        .map(|i| Fixture {
            home: team(2 * i + 1, "Home"),
            home_tactic: Tactic::default(),
            away: team(2 * i + 2, "Away"),
            away_tactic: Tactic::default(),
            seed: u64::from(i),
            match_date: None,
        })
        .collect();

    c.bench_function("fixture_day_8x4min", |b| b.iter(|| black_box(simulate_fixtures(&fixtures, &config))));
}

criterion_group!(benches, bench_short_match, bench_fixture_day);
criterion_main!(benches);
