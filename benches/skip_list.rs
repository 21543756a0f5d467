// bench.rs
#![feature(test)]

extern crate test;

use multiskip::SkipList;
use std::collections::BTreeMap;
use test::Bencher;

static BENCH_SIZE: usize = 10000;

macro_rules! do_test_bench {
    ($add: expr, $search: expr, $erase: expr) => {
        for i in 0..BENCH_SIZE {
            $add(i * 7 % BENCH_SIZE);
        }
        for i in 0..BENCH_SIZE {
            $search(i);
        }
        for i in 0..BENCH_SIZE {
            $erase(i);
        }
    };
}

#[bench]
fn calc_skip_list(b: &mut Bencher) {
    b.iter(|| {
        let mut list = SkipList::with_seed(1);
        do_test_bench!(
            |x| list.add(x),
            |x| test::black_box(list.search(&x)),
            |x| test::black_box(list.erase(&x))
        );
    })
}

#[bench]
fn calc_btree(b: &mut Bencher) {
    b.iter(|| {
        let mut map: BTreeMap<usize, usize> = BTreeMap::new();
        do_test_bench!(
            |x| *map.entry(x).or_insert(0) += 1,
            |x| test::black_box(map.contains_key(&x)),
            |x: usize| test::black_box(map.remove(&x).is_some())
        );
    })
}
