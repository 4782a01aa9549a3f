//! Concurrency helper: harvest several videos at once while committing results in input order.

use anyhow::Result;
use rayon::prelude::*;

/// Run `work` over `items` with at most `limit` in flight, handing results to
/// `commit` strictly in input order. With `limit <= 1` everything runs on the
/// calling thread. At most one chunk of results is held at a time.
pub fn for_each_ordered_limited<T, R, W, C>(items: &[T], limit: usize, work: W, mut commit: C) -> Result<()>
where
    T: Sync,
    R: Send,
    W: Sync + Fn(&T) -> Result<R>,
    C: FnMut(R) -> Result<()>,
{
    if limit <= 1 {
        for item in items {
            commit(work(item)?)?;
        }
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(limit)
        .thread_name(|i| format!("harvest-{i}"))
        .build()?;

    for chunk in items.chunks(limit) {
        let results: Vec<R> = pool.install(|| chunk.par_iter().map(|item| work(item)).collect::<Result<Vec<_>>>())?;
        for r in results {
            commit(r)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn commits_in_input_order() {
        let items: Vec<u64> = (0..10).collect();
        let mut seen = Vec::new();
        for_each_ordered_limited(
            &items,
            4,
            |&i| {
                // later items finish first inside each chunk
                std::thread::sleep(Duration::from_millis(20 - 2 * i));
                Ok(i * 10)
            },
            |r| {
                seen.push(r);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(seen, (0..10).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[test]
    fn first_error_stops_the_run() {
        let items = vec![1, 2, 3];
        let mut committed = 0;
        let res = for_each_ordered_limited(
            &items,
            1,
            |&i| if i == 2 { Err(anyhow::anyhow!("boom")) } else { Ok(i) },
            |_| {
                committed += 1;
                Ok(())
            },
        );
        assert!(res.is_err());
        assert_eq!(committed, 1);
    }
}
