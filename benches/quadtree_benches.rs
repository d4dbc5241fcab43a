use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use point_quadtree::{Config, Point, Quadtree};
use rand::RngCore;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn get_rand() -> impl rand::Rng {
    SmallRng::seed_from_u64(0xdeadbeef)
}

fn rand_point(rng: &mut impl Rng, max: f64) -> Point {
    Point::new(rng.gen_range(0.0, max), rng.gen_range(0.0, max))
}

fn grid(size: f64) -> Config {
    let half = size / 2.0;
    Config::new(Point::new(half, half), Point::new(half, half))
}

fn contains_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree contains_rand");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, move |b, &size| {
            let mut rng = get_rand();

            let table = Quadtree::from_iterator((0..size).map(|i| (rand_point(&mut rng, 8000.0), i)));

            b.iter(|| {
                let p = rand_point(&mut rng, 8000.0);
                table.contains(&p)
            })
        });
    }
    group.finish();
}

fn region_query_sparse(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree region_query sparse");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let table = Quadtree::from_iterator(
                (0..size).map(|_| (rand_point(&mut rng, 3900.0 * 2.0), rng.next_u32())),
            );

            let radius = Point::new(512.0, 512.0);
            let mut res = Vec::new();
            b.iter(|| {
                let table = &table;
                let p = rand_point(&mut rng, 3900.0 * 2.0);
                res.clear();
                table.region_query_into(&(p - radius), &(p + radius), &mut res);
                black_box(&res);
            });
        });
    }
    group.finish();
}

fn region_query_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree region_query dense");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let table = Quadtree::from_iterator(
                (0..size).map(|_| (rand_point(&mut rng, 200.0 * 2.0), rng.next_u32())),
            );

            let radius = Point::new(50.0, 50.0);
            let mut res = Vec::new();
            b.iter(|| {
                let table = &table;
                let p = rand_point(&mut rng, 200.0 * 2.0);
                res.clear();
                table.region_query_into(&(p - radius), &(p + radius), &mut res);
                black_box(&res);
            });
        });
    }
    group.finish();
}

fn make_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree make_table");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            b.iter(|| {
                Quadtree::from_iterator(
                    (0..size).map(|_| (rand_point(&mut rng, 3900.0 * 2.0), rng.next_u32())),
                )
            });
        });
    }
    group.finish();
}

fn rebuild_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree rebuild_table");
    for size in 8..16 {
        let size = 1 << size;

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();

            let mut table = Quadtree::with_config(grid(3900.0 * 2.0));

            b.iter(|| {
                table.clear();

                table.extend(
                    (0..size).map(|_| (rand_point(&mut rng, 3900.0 * 2.0), rng.next_u32())),
                );
            });
        });
    }
    group.finish();
}

fn get_rand_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree get random");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &len| {
            let mut rng = get_rand();

            let table = Quadtree::from_iterator(
                (0..len).map(|_| (rand_point(&mut rng, 3900.0 * 2.0), rng.next_u32())),
            );

            b.iter(|| {
                let pos = rand_point(&mut rng, 3900.0 * 2.0);
                table.get(&pos).copied()
            });
        });
    }
    group.finish();
}

fn get_in_table_rand(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree get, all queried elements are in the table");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &len| {
            let mut rng = get_rand();

            let mut points = Vec::with_capacity(len);
            let table = Quadtree::from_iterator((0..len).map(|_| {
                let pos = rand_point(&mut rng, 3900.0 * 2.0);
                points.push(pos);
                (pos, rng.next_u32())
            }));

            b.iter(|| {
                let i = rng.gen_range(0, points.len());
                table.get(&points[i]).copied()
            });
        });
    }
    group.finish();
}

fn random_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree random_insert");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let mut table = Quadtree::with_config(grid(29000.0));

            for _ in 0..size {
                let _ = table.insert(rand_point(&mut rng, 29000.0), 420);
            }

            b.iter(|| table.insert(rand_point(&mut rng, 29000.0), 420).is_ok());
        });
    }
    group.finish();
}

fn insert_remove_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quadtree insert_remove churn");
    for size in 8..16 {
        let size = 1 << size;
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = get_rand();
            let mut table = Quadtree::with_config(grid(29000.0).with_bucket_capacity(4));

            for _ in 0..size {
                let _ = table.insert(rand_point(&mut rng, 29000.0), 420);
            }

            b.iter(|| {
                let p = rand_point(&mut rng, 29000.0);
                let _ = table.insert(p, 420);
                table.remove(&p)
            });
        });
    }
    group.finish();
}

criterion_group!(
    quadtree_benches,
    contains_rand,
    region_query_sparse,
    region_query_dense,
    make_table,
    random_insert,
    rebuild_table,
    get_in_table_rand,
    get_rand_point,
    insert_remove_churn,
);

criterion_main!(quadtree_benches);
