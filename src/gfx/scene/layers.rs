//! Render layer membership
//!
//! Every node carries a 32-channel bitmask. Two masks "test" positive when
//! they share at least one channel. New nodes start on channel 0 only.

/// Channels with a meaning in this scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    Standard = 1,
    Bloom = 2,
}

impl RenderLayer {
    pub fn channel(self) -> u32 {
        self as u32
    }

    /// A mask with only this channel set
    pub fn layers(self) -> Layers {
        Layers::only(self.channel())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layers(u32);

impl Default for Layers {
    fn default() -> Self {
        Self::only(0)
    }
}

impl Layers {
    pub fn only(channel: u32) -> Self {
        Self(1 << (channel & 31))
    }

    /// Replaces the membership with a single channel
    pub fn set(&mut self, channel: u32) {
        *self = Self::only(channel);
    }

    pub fn enable(&mut self, channel: u32) {
        self.0 |= 1 << (channel & 31);
    }

    pub fn disable(&mut self, channel: u32) {
        self.0 &= !(1 << (channel & 31));
    }

    pub fn with(mut self, layer: RenderLayer) -> Self {
        self.enable(layer.channel());
        self
    }

    pub fn is_enabled(&self, channel: u32) -> bool {
        self.0 & (1 << (channel & 31)) != 0
    }

    /// True when both masks share a channel
    pub fn test(&self, other: &Layers) -> bool {
        self.0 & other.0 != 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_membership_is_channel_zero() {
        let layers = Layers::default();
        assert!(layers.is_enabled(0));
        assert!(!layers.test(&RenderLayer::Bloom.layers()));
        assert_eq!(layers.bits(), 1);
    }

    #[test]
    fn test_enable_keeps_existing_channels() {
        let layers = Layers::default().with(RenderLayer::Bloom);
        assert!(layers.is_enabled(0));
        assert!(layers.test(&RenderLayer::Bloom.layers()));
        assert!(!layers.test(&RenderLayer::Standard.layers()));
    }

    #[test]
    fn test_set_and_disable() {
        let mut layers = Layers::default().with(RenderLayer::Bloom);
        layers.set(RenderLayer::Standard.channel());
        assert_eq!(layers, RenderLayer::Standard.layers());

        layers.disable(RenderLayer::Standard.channel());
        assert_eq!(layers.bits(), 0);
    }
}
