//! Tile dispatch for data-parallel kernels
//!
//! A kernel is called once per output slot. Slots are grouped into contiguous
//! tiles and each tile is handed to one unit of execution. `run` returns only
//! once every tile has finished, which is the barrier the gravity step relies
//! on before committing its scratch buffer.

use rayon::prelude::*;

/// Parallel-for over `0..out.len()` with a post-barrier.
///
/// Each kernel invocation gets exclusive access to exactly one slot, so no two
/// lanes can write the same index.
pub trait ParallelFor {
    fn run<T, F>(&self, out: &mut [T], tile_size: usize, kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync;
}

/// Runs tiles one after another on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct Serial;

impl ParallelFor for Serial {
    fn run<T, F>(&self, out: &mut [T], tile_size: usize, kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        let tile_size = tile_size.max(1);
        for (tile, chunk) in out.chunks_mut(tile_size).enumerate() {
            let base = tile * tile_size;
            for (lane, slot) in chunk.iter_mut().enumerate() {
                kernel(base + lane, slot);
            }
        }
    }
}

/// One rayon task per tile on the global thread pool
#[derive(Debug, Clone, Copy, Default)]
pub struct Rayon;

impl ParallelFor for Rayon {
    fn run<T, F>(&self, out: &mut [T], tile_size: usize, kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        let tile_size = tile_size.max(1);
        out.par_chunks_mut(tile_size)
            .enumerate()
            .for_each(|(tile, chunk)| {
                let base = tile * tile_size;
                for (lane, slot) in chunk.iter_mut().enumerate() {
                    kernel(base + lane, slot);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<P: ParallelFor>(backend: P, len: usize, tile: usize) -> Vec<usize> {
        let mut out = vec![usize::MAX; len];
        backend.run(&mut out, tile, |i, slot| *slot = i * 3);
        out
    }

    #[test]
    fn test_every_index_visited_once() {
        for tile in [1, 7, 64, 1000] {
            let expected: Vec<usize> = (0..130).map(|i| i * 3).collect();
            assert_eq!(fill(Serial, 130, tile), expected);
            assert_eq!(fill(Rayon, 130, tile), expected);
        }
    }

    #[test]
    fn test_empty_and_zero_tile() {
        assert!(fill(Serial, 0, 64).is_empty());
        assert!(fill(Rayon, 0, 64).is_empty());
        assert_eq!(fill(Serial, 3, 0), vec![0, 3, 6]);
    }
}
