// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_data`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::borrow::Cow;
use std::sync::Once;
use std::{string::String, vec::Vec};

use understory_data::{
    AttributeProvider, DataStore, DataValue, NodeType, Plain, SiloKind, Subject,
};

#[derive(Clone)]
struct Elem {
    key: u32,
    attrs: Vec<(String, String)>,
}

impl Elem {
    fn new(key: u32) -> Self {
        Self {
            key,
            attrs: Vec::new(),
        }
    }

    fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }
}

impl AttributeProvider for Elem {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

impl Subject for Elem {
    type Key = u32;

    fn key(&self) -> u32 {
        self.key
    }

    fn node_type(&self) -> NodeType<'_> {
        NodeType::Number(1.0)
    }

    fn node_name(&self) -> Option<&str> {
        Some("div")
    }

    fn attributes(&self) -> Option<&dyn AttributeProvider> {
        Some(self)
    }
}

fn bench_data(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: DataStore<u32>={} DataValue={}",
            core::mem::size_of::<DataStore<u32>>(),
            core::mem::size_of::<DataValue>(),
        );
    });

    let mut group = c.benchmark_group("data/read");

    group.bench_function("plain", |b| {
        let mut store = DataStore::new();
        let o = Plain(1_u32);
        store.set(&o, "foo", 1_u64);
        b.iter(|| black_box(store.get::<u64>(&o, "foo").copied()))
    });

    group.bench_function("element", |b| {
        let mut store = DataStore::new();
        let el = Elem::new(1);
        store.set(&el, "foo", 1_u64);
        b.iter(|| black_box(store.get::<u64>(&el, "foo").copied()))
    });

    group.bench_function("hyphenated_key", |b| {
        let mut store = DataStore::new();
        let el = Elem::new(1);
        store.set(&el, "foo-bar", 1_u64);
        b.iter(|| black_box(store.get::<u64>(&el, "foo-bar").copied()))
    });

    group.bench_function("miss", |b| {
        let mut store = DataStore::new();
        let el = Elem::new(1);
        store.set(&el, "foo", 1_u64);
        b.iter(|| black_box(store.read(&el, "absent", SiloKind::Private).is_some()))
    });

    group.finish();

    let mut group = c.benchmark_group("data/write");

    for count in [1_u32, 64, 1024] {
        group.bench_function(BenchmarkId::new("plain", count), |b| {
            b.iter_batched(
                DataStore::<u32>::new,
                |mut store| {
                    for key in 0..count {
                        store.set(&Plain(key), "foo", key);
                    }
                    black_box(store);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(BenchmarkId::new("element", count), |b| {
            let elems: Vec<Elem> = (0..count).map(Elem::new).collect();
            b.iter_batched(
                DataStore::<u32>::new,
                |mut store| {
                    for el in &elems {
                        store.set(el, "foo", el.key);
                    }
                    black_box(store);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();

    let mut group = c.benchmark_group("data/seed");

    group.bench_function("first_read", |b| {
        let el = Elem::new(1).with_attr("data-foo-bar", "hello world");
        b.iter_batched(
            DataStore::<u32>::new,
            |mut store| {
                black_box(store.get::<String>(&el, "fooBar").map(String::len));
                black_box(store);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("cached_read", |b| {
        let el = Elem::new(1).with_attr("data-foo-bar", "hello world");
        let mut store = DataStore::new();
        store.get::<String>(&el, "fooBar");
        b.iter(|| black_box(store.get::<String>(&el, "fooBar").map(String::len)))
    });

    group.finish();
}

criterion_group!(benches, bench_data);
criterion_main!(benches);
