//! Single-producer/single-consumer sample queue.
//!
//! Built on an unbounded `crossbeam-channel`. Neither half is `Clone`, so a
//! queue has exactly one producer and one consumer.
//!
//! The queue is deliberately unbounded: `push` never blocks the capture
//! thread. If the encoder stops draining its stdin the backlog, and memory,
//! keeps growing. Callers that need a bound must watch [`SampleProducer::len`].

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::models::sample::Sample;

/// Producer half, owned by the thread calling `add_frame`/`add_buffer`.
#[derive(Debug)]
pub struct SampleProducer {
    tx: Sender<Sample>,
}

/// Consumer half, owned by the thread writing to the encoder.
#[derive(Debug)]
pub struct SampleConsumer {
    rx: Receiver<Sample>,
}

/// Create a connected producer/consumer pair.
pub fn channel() -> (SampleProducer, SampleConsumer) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (SampleProducer { tx }, SampleConsumer { rx })
}

impl SampleProducer {
    /// Enqueue a sample. Never blocks.
    ///
    /// If the consumer is gone the sample is dropped, which releases it.
    pub fn push(&self, sample: Sample) {
        if self.tx.send(sample).is_err() {
            log::debug!("sample queue consumer is gone, dropping sample");
        }
    }

    /// Current backlog.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

impl SampleConsumer {
    /// Dequeue the oldest sample without blocking.
    pub fn pop(&self) -> Option<Sample> {
        match self.rx.try_recv() {
            Ok(sample) => Some(sample),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until a sample arrives.
    ///
    /// Returns `None` once the producer has been dropped and the backlog is
    /// fully drained.
    pub fn recv(&self) -> Option<Sample> {
        self.rx.recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::models::sample::PixelFormat;

    fn frame(tag: u8) -> Sample {
        Sample::video(1, 1, PixelFormat::Gray, vec![tag])
    }

    #[test]
    fn fifo_order() {
        let (tx, rx) = channel();
        tx.push(frame(1));
        tx.push(frame(2));
        tx.push(frame(3));

        assert_eq!(tx.len(), 3);
        assert_eq!(rx.pop().unwrap().bytes(), &[1]);
        assert_eq!(rx.pop().unwrap().bytes(), &[2]);
        assert_eq!(rx.pop().unwrap().bytes(), &[3]);
        assert!(rx.pop().is_none());
    }

    #[test]
    fn pop_on_empty_does_not_block() {
        let (tx, rx) = channel();
        assert!(rx.pop().is_none());
        assert!(tx.is_empty());
        assert!(rx.is_empty());
    }

    #[test]
    fn recv_drains_backlog_after_producer_drops() {
        let (tx, rx) = channel();
        for i in 0..5 {
            tx.push(frame(i));
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(sample) = rx.recv() {
            seen.push(sample.bytes()[0]);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn push_after_consumer_drop_releases_sample() {
        let (tx, rx) = channel();
        drop(rx);

        let sample = frame(9);
        let probe = sample.clone();
        tx.push(sample);
        assert_eq!(probe.share_count(), 1);
    }

    #[test]
    fn cross_thread_delivery() {
        let (tx, rx) = channel();
        let consumer = thread::spawn(move || {
            let mut count = 0usize;
            while rx.recv().is_some() {
                count += 1;
            }
            count
        });

        for i in 0..1000u32 {
            tx.push(frame((i % 256) as u8));
        }
        drop(tx);

        assert_eq!(consumer.join().unwrap(), 1000);
    }
}
