use multiskip::{IntSkipList, SkipList};

fn main() {
    let mut val = SkipList::with_seed(2024);
    for x in [3, 1, 4, 1, 5, 9, 2, 6] {
        val.add(x);
    }
    let mut iter = val.iter();
    assert_eq!(iter.next(), Some((&1, 2)));
    assert_eq!(iter.next(), Some((&2, 1)));
    assert_eq!(iter.next(), Some((&3, 1)));
    println!("list = {:?}, height = {}", val, val.height());

    for x in 0..10_000u32 {
        val.add(x as i32 * 7 % 10_007);
    }
    println!("level histogram = {:?}", val.level_histogram());

    let mut ints = IntSkipList::new();
    ints.add(7).expect("non-negative");
    if let Err(e) = ints.add(-7) {
        println!("rejected: {}", e);
    }
    assert!(ints.erase(7));
    assert!(ints.is_empty());
}
