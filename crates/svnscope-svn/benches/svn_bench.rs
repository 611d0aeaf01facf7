// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use svnscope_svn::parse_log;

const SEP: &str = "------------------------------------------------------------------------";

/// Build a synthetic `svn log -v` output with `commits` entries
fn synthetic_log(commits: usize) -> String {
    let mut out = format!("{SEP}\n");
    for i in (0..commits).rev() {
        out.push_str(&format!(
            "r{i} | author{} | 2026-03-02 10:15:04 +0800 (Mon, 02 Mar 2026) | 2 lines\n\
             Changed paths:\n   M /trunk/src/module{}.c\n   A /trunk/src/new{i}.c\n\n\
             Commit message {i}\n\nWith a body line.\n{SEP}\n",
            i % 10,
            i % 50
        ));
    }
    out
}

fn parse_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_log");

    for size in [100usize, 1_000, 10_000] {
        let text = synthetic_log(size);
        group.bench_with_input(BenchmarkId::new("unfiltered", size), &text, |b, text| {
            b.iter(|| parse_log(std::hint::black_box(text), None))
        });
        group.bench_with_input(BenchmarkId::new("author_filter", size), &text, |b, text| {
            b.iter(|| parse_log(std::hint::black_box(text), Some("author3")))
        });
    }

    group.finish();
}

criterion_group!(benches, parse_benchmarks);
criterion_main!(benches);
