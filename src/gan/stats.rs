//! Statistics tracking for adversarial training

use std::collections::VecDeque;

/// How many recent steps the loss history retains
const HISTORY: usize = 100;

/// Running statistics over adversarial training steps
#[derive(Debug, Clone)]
pub struct GanStats {
    /// Total training steps recorded
    pub steps: usize,
    /// Discriminator losses (recent history)
    pub dsc_losses: VecDeque<f32>,
    /// Generator losses (recent history)
    pub gen_losses: VecDeque<f32>,
}

impl Default for GanStats {
    fn default() -> Self {
        Self {
            steps: 0,
            dsc_losses: VecDeque::with_capacity(HISTORY),
            gen_losses: VecDeque::with_capacity(HISTORY),
        }
    }
}

impl GanStats {
    /// Record one step's loss pair
    pub fn record(&mut self, dsc_loss: f32, gen_loss: f32) {
        self.steps += 1;

        if self.dsc_losses.len() >= HISTORY {
            self.dsc_losses.pop_front();
        }
        self.dsc_losses.push_back(dsc_loss);

        if self.gen_losses.len() >= HISTORY {
            self.gen_losses.pop_front();
        }
        self.gen_losses.push_back(gen_loss);
    }

    /// Average discriminator loss over the retained history
    #[must_use]
    pub fn avg_dsc_loss(&self) -> f32 {
        if self.dsc_losses.is_empty() {
            return 0.0;
        }
        self.dsc_losses.iter().sum::<f32>() / self.dsc_losses.len() as f32
    }

    /// Average generator loss over the retained history
    #[must_use]
    pub fn avg_gen_loss(&self) -> f32 {
        if self.gen_losses.is_empty() {
            return 0.0;
        }
        self.gen_losses.iter().sum::<f32>() / self.gen_losses.len() as f32
    }
}
