use std::sync::Arc;

use rstest::rstest;

use crate::PageCache;

fn page_text(page: usize) -> Arc<str> {
    Arc::from(format!("page {page}\n"))
}

#[test]
fn fifteen_loads_keep_the_ten_most_recent() {
    let mut cache = PageCache::default();
    for page in 0..15 {
        cache.put(page, page_text(page));
    }
    assert_eq!(cache.len(), 10);
    for evicted in 0..5 {
        assert!(!cache.contains(evicted), "page {evicted} should be evicted");
    }
    for kept in 5..15 {
        assert!(cache.contains(kept), "page {kept} should be cached");
    }
}

#[test]
fn access_order_decides_eviction() {
    let mut cache = PageCache::default();
    for page in 0..10 {
        cache.put(page, page_text(page));
    }
    // Touch the five oldest; the next five inserts evict pages 5..10.
    for page in 0..5 {
        assert!(cache.get(page).is_some());
    }
    for page in 10..15 {
        cache.put(page, page_text(page));
    }
    let mut cached = cache.pages();
    cached.sort_unstable();
    assert_eq!(cached, [0, 1, 2, 3, 4, 10, 11, 12, 13, 14]);
}

#[rstest]
#[case::single(1)]
#[case::default_capacity(10)]
#[case::large(64)]
fn repeated_put_is_idempotent(#[case] capacity: usize) {
    let mut cache = PageCache::new(capacity);
    cache.put(3, page_text(3));
    let first = cache.get(3);
    cache.put(3, page_text(3));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(3), first);
}

/// Property: whatever the access pattern, the cache never grows past its
/// capacity and always holds the page touched last.
#[quickcheck_macros::quickcheck]
fn bounded_and_keeps_latest(ops: Vec<(bool, u8)>, capacity: u8) -> bool {
    let mut cache = PageCache::new(usize::from(capacity % 16));
    ops.into_iter().all(|(insert, page)| {
        let page = usize::from(page % 32);
        if insert {
            cache.put(page, page_text(page));
        } else if cache.get(page).is_none() {
            return cache.len() <= cache.capacity();
        }
        cache.len() <= cache.capacity() && cache.pages().first() == Some(&page)
    })
}
