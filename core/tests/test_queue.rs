// Work queue: FIFO hand-off, closing semantics, and backpressure.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use rlepack_core::stream::queue::{QueueError, WorkQueue};

    #[test]
    fn pops_in_push_order() {
        let q = WorkQueue::bounded(8);
        for i in 0..5 {
            q.push(i).unwrap();
        }
        q.close().unwrap();

        let got: Vec<i32> = std::iter::from_fn(|| q.pop()).collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn closed_queue_still_drains_before_terminating() {
        let q = WorkQueue::bounded(4);
        q.push("a").unwrap();
        q.close().unwrap();

        assert!(q.is_closed());
        assert_eq!(q.pop(), Some("a"));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn push_after_close_fails() {
        let q = WorkQueue::bounded(1);
        q.close().unwrap();
        assert_eq!(q.push(1), Err(QueueError::Closed));
    }

    #[test]
    fn close_is_idempotent() {
        let q: WorkQueue<u8> = WorkQueue::bounded(1);
        q.close().unwrap();
        q.close().unwrap();
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn close_wakes_every_waiting_consumer() {
        let q: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::bounded(2));
        let woke = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let q = q.clone();
                let woke = woke.clone();
                thread::spawn(move || {
                    assert_eq!(q.pop(), None);
                    woke.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(woke.load(Ordering::SeqCst), 0);

        q.close().unwrap();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(woke.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn full_queue_blocks_push_until_pop() {
        let q: Arc<WorkQueue<u32>> = Arc::new(WorkQueue::bounded(1));
        q.push(1).unwrap();
        assert_eq!(q.len(), q.capacity());

        let pushed = Arc::new(AtomicUsize::new(0));
        let producer = {
            let q = q.clone();
            let pushed = pushed.clone();
            thread::spawn(move || {
                q.push(2).unwrap();
                pushed.store(1, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert_eq!(pushed.load(Ordering::SeqCst), 0, "push must wait for space");

        assert_eq!(q.pop(), Some(1));
        producer.join().unwrap();
        assert_eq!(pushed.load(Ordering::SeqCst), 1);
        assert_eq!(q.pop(), Some(2));
    }

    #[test]
    fn every_item_is_consumed_exactly_once() {
        let q: Arc<WorkQueue<u64>> = Arc::new(WorkQueue::bounded(4));
        let total = 1_000u64;

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let q = q.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(v) = q.pop() {
                        seen.push(v);
                    }
                    seen
                })
            })
            .collect();

        for i in 0..total {
            q.push(i).unwrap();
        }
        q.close().unwrap();

        let mut all: Vec<u64> = consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let q = WorkQueue::bounded(0);
        assert_eq!(q.capacity(), 1);
        q.push(9u8).unwrap();
        assert_eq!(q.pop(), Some(9));
    }
}
