use std::hint::black_box;

use bednest::entities::{Bin, Item};
use bednest::geometry::primitives::{Polygon, Rect};
use bednest::placement::{BottomLeftPlacer, PlacementConfig, PlacementStrategy};
use criterion::{Criterion, criterion_group, criterion_main};

fn occupied_placer(n_items: usize) -> (BottomLeftPlacer, Vec<Item>) {
    let bin = Bin::Rect(Rect::new(0.0, 0.0, 250.0, 250.0));
    let config = PlacementConfig {
        rotations: vec![0.0],
        parallel: false,
        ..PlacementConfig::default()
    };
    let mut placer = BottomLeftPlacer::new(bin, &config);

    let mut items: Vec<Item> = (0..=n_items)
        .map(|id| Item::new(id, format!("square_{id}"), Polygon::rectangle(20.0, 20.0)))
        .collect();

    for idx in 0..n_items {
        let result = placer.try_pack(&items, idx, &[]);
        placer.accept(&mut items, &result);
    }

    (placer, items)
}

fn try_pack_bench(c: &mut Criterion) {
    let (placer, items) = occupied_placer(12);
    let candidate = items.len() - 1;

    c.bench_function("try_pack_12_occupied", |b| {
        b.iter(|| black_box(placer.try_pack(black_box(&items), candidate, &[])))
    });
}

criterion_group!(benches, try_pack_bench);
criterion_main!(benches);
