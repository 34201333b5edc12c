use criterion::{black_box, criterion_group, criterion_main, Criterion};

use molsketch::layout::kamada_kawai::{self, KkParams};
use molsketch::math::DVec2;
use molsketch::rings::{close_ring_bonds, RingSet};
use molsketch::{parse_smiles, Drawer, Graph};

const BENZENE: &str = "c1ccccc1";
const CAFFEINE: &str = "Cn1cnc2c1c(=O)n(C)c(=O)n2C";
const ATORVASTATIN: &str =
    "CC(C)c1c(C(=O)Nc2ccccc2)c(-c2ccccc2)c(-c2ccc(F)cc2)n1CC[C@@H](O)C[C@@H](O)CC(=O)O";
const CUBANE: &str = "C12C3C4C1C5C3C4C25";

fn ring_graph(smiles: &str) -> Graph {
    let mut g = Graph::from_parse_tree(&parse_smiles(smiles).unwrap(), true);
    close_ring_bonds(&mut g).unwrap();
    g
}

fn bench_draw(c: &mut Criterion) {
    let drawer = Drawer::default();
    let mut group = c.benchmark_group("draw");

    group.bench_function("benzene", |b| {
        b.iter(|| black_box(drawer.draw_smiles(black_box(BENZENE)).unwrap()))
    });
    group.bench_function("caffeine", |b| {
        b.iter(|| black_box(drawer.draw_smiles(black_box(CAFFEINE)).unwrap()))
    });
    group.bench_function("atorvastatin", |b| {
        b.iter(|| black_box(drawer.draw_smiles(black_box(ATORVASTATIN)).unwrap()))
    });
    group.bench_function("cubane", |b| {
        b.iter(|| black_box(drawer.draw_smiles(black_box(CUBANE)).unwrap()))
    });

    group.finish();
}

fn bench_rings(c: &mut Criterion) {
    let caffeine = ring_graph(CAFFEINE);
    let atorvastatin = ring_graph(ATORVASTATIN);

    let mut group = c.benchmark_group("rings");

    group.bench_function("caffeine", |b| {
        b.iter(|| {
            let mut g = caffeine.clone();
            black_box(RingSet::perceive(&mut g))
        })
    });
    group.bench_function("atorvastatin", |b| {
        b.iter(|| {
            let mut g = atorvastatin.clone();
            black_box(RingSet::perceive(&mut g))
        })
    });

    group.finish();
}

fn bench_kamada_kawai(c: &mut Criterion) {
    let cubane = ring_graph(CUBANE);
    let ids: Vec<usize> = (0..cubane.vertex_count()).collect();
    let params = KkParams::default();

    c.bench_function("kamada_kawai/cubane", |b| {
        b.iter(|| {
            let mut g = cubane.clone();
            black_box(kamada_kawai::layout(&mut g, &ids, DVec2::ZERO, None, &params).unwrap())
        })
    });
}

criterion_group!(benches, bench_draw, bench_rings, bench_kamada_kawai);
criterion_main!(benches);
