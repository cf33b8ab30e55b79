use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use stopgo_core::{ClassifierConfig, Sample, StopGoClassifier};

// Synthetic commute: transit legs at 5 m/s alternating with noisy dwell
// clusters, positions jittered by a tiny PRNG so no two points collide.
fn synth_trace(n: usize, seed: u32) -> Vec<Sample> {
    let mut state = seed.max(1);
    let mut next_f64 = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / f64::from(u32::MAX)
    };
    let mut samples = Vec::with_capacity(n);
    let mut x = 0.0f64;
    for i in 0..n {
        let phase = (i / 120) % 2;
        if phase == 0 {
            x += 5.0;
            samples.push(Sample {
                ts: i as f64,
                x,
                y: (next_f64() - 0.5) * 0.4,
                motion_score: None,
            });
        } else {
            samples.push(Sample {
                ts: i as f64,
                x: x + (next_f64() - 0.5) * 3.0,
                y: (next_f64() - 0.5) * 3.0,
                motion_score: None,
            });
        }
    }
    samples
}

pub fn bench_classify(c: &mut Criterion) {
    let mut g = c.benchmark_group("classify");
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE") {
        if let Ok(n) = ss.parse::<usize>() {
            g.sample_size(n.max(10));
        }
    } else {
        g.sample_size(30);
    }

    let classifier = StopGoClassifier::new(ClassifierConfig::default()).unwrap();
    for &n in &[600usize, 2400] {
        let trace = synth_trace(n, 0xC0FFEE);
        g.bench_function(format!("commute_{n}"), |b| {
            b.iter_batched(
                || trace.clone(),
                |trace| black_box(classifier.classify(&trace)),
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
