//! Tests for the lock-free instance pool

use crate::pool::{Pool, PoolMetricsSnapshot, Reusable};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default)]
struct Scratch {
    buf: Vec<u8>,
    resets: usize,
}

impl Reusable for Scratch {
    fn reset(&mut self) {
        self.buf.clear();
        self.resets += 1;
    }
}

#[test]
fn test_new_pool_is_empty() {
    let pool: Pool<Scratch> = Pool::new(10);

    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.available(), 0);
    assert!(pool.is_empty());
    assert!(!pool.is_full());
}

#[test]
fn test_zero_capacity_treated_as_one() {
    let pool: Pool<Scratch> = Pool::new(0);
    assert_eq!(pool.capacity(), 1);
}

#[test]
fn test_get_from_empty_pool_allocates() {
    let pool: Pool<Scratch> = Pool::new(2);

    let item = pool.get();
    assert!(item.buf.is_empty());
    assert_eq!(item.resets, 0);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.hits, 0);
}

#[test]
fn test_drop_returns_to_pool() {
    let pool: Pool<Scratch> = Pool::new(2);

    {
        let mut item = pool.get();
        item.buf.extend_from_slice(b"hello");
    }

    assert_eq!(pool.available(), 1);
    assert_eq!(pool.metrics().snapshot().returns, 1);
}

#[test]
fn test_reused_instance_is_reset_and_keeps_capacity() {
    let pool: Pool<Scratch> = Pool::new(2);

    {
        let mut item = pool.get();
        item.buf.extend_from_slice(&[0u8; 4096]);
    }

    let item = pool.get();
    assert!(item.buf.is_empty());
    assert!(item.buf.capacity() >= 4096);
    assert_eq!(item.resets, 1);
    assert_eq!(pool.metrics().snapshot().hits, 1);
}

#[test]
fn test_explicit_release() {
    let pool: Pool<Scratch> = Pool::new(2);

    let item = pool.get();
    item.release();

    assert_eq!(pool.available(), 1);
}

#[test]
fn test_release_on_error_path() {
    fn fails(pool: &Pool<Scratch>) -> Result<(), String> {
        let mut item = pool.get();
        let byte: Result<u8, String> = Err("boom".to_string());
        item.buf.push(byte?);
        Ok(())
    }

    let pool: Pool<Scratch> = Pool::new(2);
    assert!(fails(&pool).is_err());
    assert_eq!(pool.available(), 1);
}

#[test]
fn test_detach_does_not_return() {
    let pool: Pool<Scratch> = Pool::new(2);

    let mut item = pool.get();
    item.buf.push(7);
    let owned = item.detach();

    assert_eq!(owned.buf, vec![7]);
    assert_eq!(pool.available(), 0);
    assert_eq!(pool.metrics().snapshot().returns, 0);
}

#[test]
fn test_put_drops_when_pool_full() {
    let pool: Pool<Scratch> = Pool::new(1);

    pool.put(Scratch::default());
    pool.put(Scratch::default());

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.returns, 1);
    assert_eq!(snapshot.drops, 1);
    assert!(pool.is_full());
}

#[test]
fn test_multiple_get_put_cycles() {
    let pool: Pool<Scratch> = Pool::new(3);

    for _ in 0..100 {
        let item = pool.get();
        drop(item);
    }

    assert_eq!(pool.available(), 1);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.hits, 99);
    assert_eq!(snapshot.returns, 100);
    assert_eq!(snapshot.drops, 0);
}

#[test]
fn test_concurrent_access() {
    let pool: Arc<Pool<Scratch>> = Arc::new(Pool::new(16));
    let mut handles = vec![];

    for _ in 0..10 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for i in 0..100u8 {
                let mut item = pool.get();
                item.buf.push(i);
                std::hint::black_box(&item.buf);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Never more than one instance per thread was live at a time
    assert!(pool.available() <= 10);

    let snapshot = pool.metrics().snapshot();
    assert_eq!(snapshot.hits + snapshot.misses, 1000);
    assert_eq!(snapshot.returns + snapshot.drops, 1000);
}

#[test]
fn test_snapshot_hit_rate() {
    let empty = PoolMetricsSnapshot::default();
    assert_eq!(empty.hit_rate(), 1.0);

    let snapshot = PoolMetricsSnapshot {
        hits: 1,
        misses: 1,
        ..Default::default()
    };
    assert_eq!(snapshot.hit_rate(), 0.5);
}
