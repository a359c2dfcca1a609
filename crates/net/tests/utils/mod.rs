use std::time::Duration;

use anyhow::Result;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use lpf_framer::{encode_frame, Message};

/// Fail the test if `fut` takes longer than a few seconds, instead of hanging the test run.
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: std::future::Future<Output = Result<T>>,
{
    let res = tokio::time::timeout(Duration::from_secs(5), fut).await;
    assert!(res.is_ok(), "Timed out");
    let inner_res = res.unwrap();
    assert!(inner_res.is_ok(), "{:?}", inner_res.as_ref().err());
    inner_res.unwrap()
}

/// Frame all of `messages` into one byte string.
pub fn frames(messages: &[Message]) -> Vec<u8> {
    let mut out = vec![];
    for m in messages {
        encode_frame(m.body(), &mut out).expect("Should encode");
    }
    out
}

/// Write `bytes` in randomly sized pieces, yielding between each so that the reader sees them separately.
pub async fn trickle<W: AsyncWrite + Unpin>(writer: &mut W, bytes: &[u8], seed: u64) -> Result<()> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut rest = bytes;
    while !rest.is_empty() {
        let n = rng.gen_range(1..=rest.len().min(9));
        let (head, tail) = rest.split_at(n);
        writer.write_all(head).await?;
        writer.flush().await?;
        tokio::task::yield_now().await;
        rest = tail;
    }
    Ok(())
}
