///////////////////////////////
/// Total number of threads to use; autodetected unless given
pub fn determine_thread_counts_1(total: Option<usize>) -> anyhow::Result<usize> {
    if let Some(total) = total {
        if total == 0 {
            anyhow::bail!("Number of threads must be at least 1");
        }
        anyhow::Ok(total)
    } else {
        let total = std::thread::available_parallelism();
        if let Ok(total) = total {
            anyhow::Ok(total.get())
        } else {
            log::warn!("Could not autodetect the number of threads available. Setting to 1, but it is better if you specify");
            anyhow::Ok(1)
        }
    }
}

///////////////////////////////
/// Threads per worker when `total` threads are shared by `workers` parallel jobs. Always at least 1
pub fn threads_per_worker(total: usize, workers: usize) -> usize {
    if workers == 0 {
        return total.max(1);
    }
    (total / workers).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_count() {
        assert_eq!(determine_thread_counts_1(Some(4)).unwrap(), 4);
        assert!(determine_thread_counts_1(Some(0)).is_err());
        assert!(determine_thread_counts_1(None).unwrap() >= 1);
    }

    #[test]
    fn split() {
        assert_eq!(threads_per_worker(8, 2), 4);
        assert_eq!(threads_per_worker(3, 4), 1);
        assert_eq!(threads_per_worker(5, 0), 5);
    }
}
