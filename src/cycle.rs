use anyhow::{anyhow, Result};

/// Which texture is shown, advanced by pointer clicks.
///
/// The generation counter lets asynchronous loads notice that a newer click
/// has happened since they started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureCycle {
    names: Vec<String>,
    current: usize,
    generation: u64,
}

impl TextureCycle {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(anyhow!("texture cycle needs at least one texture"));
        }
        Ok(Self {
            names,
            current: 0,
            generation: 0,
        })
    }

    pub fn current(&self) -> &str {
        &self.names[self.current]
    }

    /// Moves to the next texture, wrapping at the end, and returns its name.
    pub fn advance(&mut self) -> &str {
        self.current = (self.current + 1) % self.names.len();
        self.generation += 1;
        self.current()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when no click has happened since `generation` was captured.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_textures_toggle() {
        let mut cycle = TextureCycle::new(["grass", "stone"]).unwrap();
        assert_eq!(cycle.current(), "grass");
        assert_eq!(cycle.advance(), "stone");
        assert_eq!(cycle.advance(), "grass");
        assert_eq!(cycle.generation(), 2);
    }

    #[test]
    fn single_texture_stays_put() {
        let mut cycle = TextureCycle::new(["grass"]).unwrap();
        assert_eq!(cycle.advance(), "grass");
    }

    #[test]
    fn empty_cycle_is_rejected() {
        assert!(TextureCycle::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn newer_clicks_supersede_pending_loads() {
        let mut cycle = TextureCycle::new(["grass", "stone", "dirt"]).unwrap();
        cycle.advance();
        let pending = cycle.generation();
        assert!(cycle.is_current(pending));
        cycle.advance();
        assert!(!cycle.is_current(pending));
        assert_eq!(cycle.current(), "dirt");
    }
}
