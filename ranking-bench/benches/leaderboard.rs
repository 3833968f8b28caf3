//! Leaderboard Benchmark Suite
//!
//! Targets for a 10 000-member board:
//!   rank_and_paginate_10k ........... < 5ms
//!   render_all_pages_10k ............ < 10ms
//!   json_save_load_10k .............. < 50ms
//!   sqlite_save_load_10k ............ < 50ms
//!   store_update_add_1k ............. < 5ms (in-memory backend)

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use ranking_bot::config::EmbedConfig;
use ranking_bot::response::Embed;
use ranking_core::config::{BackendKind, PersistenceConfig};
use ranking_core::ranking::{paginate, rank, DEFAULT_PAGE_SIZE};
use ranking_core::{Leaderboard, LeaderboardStore, MemberId};

fn make_board(members: u64) -> Leaderboard {
    (0..members)
        .map(|i| {
            let id = MemberId::from(i);
            // Spread with plenty of ties so the stable sort does real work.
            let points = i64::try_from((i * 7919) % 1000).unwrap_or(0);
            (id, ranking_core::ScoreRecord::new(format!("member{i}"), points))
        })
        .collect()
}

/// Benchmark: Rank and split 10k members into pages.
fn bench_rank_and_paginate(c: &mut Criterion) {
    let board = make_board(10_000);

    c.bench_function("rank_and_paginate_10k", |b| {
        b.iter(|| {
            let pages = paginate(rank(black_box(&board)), DEFAULT_PAGE_SIZE);
            black_box(pages);
        });
    });
}

/// Benchmark: Render every page of a 10k board as embeds.
fn bench_render_pages(c: &mut Criterion) {
    let pages = paginate(rank(&make_board(10_000)), DEFAULT_PAGE_SIZE);
    let style = EmbedConfig::default();

    c.bench_function("render_all_pages_10k", |b| {
        b.iter(|| {
            let embeds: Vec<Embed> = pages
                .iter()
                .map(|page| Embed::leaderboard_page(black_box(page), &style))
                .collect();
            black_box(embeds);
        });
    });
}

fn bench_backend(c: &mut Criterion, name: &str, backend: BackendKind, file: &str) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LeaderboardStore::open(&PersistenceConfig {
        backend,
        path: dir.path().join(file),
        ..PersistenceConfig::default()
    })
    .expect("open store");
    let board = make_board(10_000);

    c.bench_function(name, |b| {
        b.iter(|| {
            store.save(black_box(&board)).expect("save");
            black_box(store.load().expect("load"));
        });
    });
}

/// Benchmark: Full save + load through the JSON file backend.
fn bench_json_roundtrip(c: &mut Criterion) {
    bench_backend(c, "json_save_load_10k", BackendKind::Json, "leaderboard.json");
}

/// Benchmark: Full save + load through the SQLite backend.
fn bench_sqlite_roundtrip(c: &mut Criterion) {
    bench_backend(c, "sqlite_save_load_10k", BackendKind::Sqlite, "leaderboard.db");
}

/// Benchmark: 1k locked read-modify-write cycles against memory.
fn bench_store_updates(c: &mut Criterion) {
    c.bench_function("store_update_add_1k", |b| {
        b.iter_batched(
            LeaderboardStore::in_memory,
            |store| {
                for i in 0..1_000_u64 {
                    let id = MemberId::from(i % 50);
                    store
                        .update(|lb| lb.upsert_add(&id, "member", 1))
                        .expect("update");
                }
                black_box(store);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_rank_and_paginate,
    bench_render_pages,
    bench_json_roundtrip,
    bench_sqlite_roundtrip,
    bench_store_updates,
);
criterion_main!(benches);
