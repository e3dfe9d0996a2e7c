//! Stream pool - the ordered set of streams on screen.

use rand::Rng;

use crate::stream::Stream;
use crate::types::RainConfig;

#[derive(Debug, Clone, Default)]
pub struct StreamPool {
    streams: Vec<Stream>,
}

impl StreamPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away every stream and regenerate the pool for the new geometry.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        config: &RainConfig,
        width: u16,
        height: u16,
        rng: &mut R,
    ) {
        let count = config.streams_for_width(width);
        self.streams = (0..count)
            .map(|_| Stream::new(config, width, height, rng))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stream> {
        self.streams.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Stream> {
        self.streams.iter_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Stream> {
        self.streams.get_mut(index)
    }

    /// Drop every stream and its storage.
    pub fn release(&mut self) {
        self.streams = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn derived_count_follows_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = StreamPool::new();
        pool.rebuild(&RainConfig::default(), 80, 24, &mut rng);
        assert_eq!(pool.len(), 104);

        pool.rebuild(&RainConfig::default(), 10, 24, &mut rng);
        assert_eq!(pool.len(), 13);
    }

    #[test]
    fn configured_count_is_pinned() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = RainConfig {
            stream_count: Some(5),
            ..RainConfig::ascii()
        };
        let mut pool = StreamPool::new();
        pool.rebuild(&config, 200, 50, &mut rng);
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|s| s.y == 0.0 && s.x < 200));
    }

    #[test]
    fn release_empties_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = StreamPool::new();
        pool.rebuild(&RainConfig::ascii(), 20, 10, &mut rng);
        pool.release();
        assert!(pool.is_empty());
        pool.release();
        assert!(pool.is_empty());
    }
}
