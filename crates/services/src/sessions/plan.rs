use rand::rng;
use rand::seq::SliceRandom;

use portal_core::model::Question;

/// Question selection for one sitting.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraw {
    pub questions: Vec<Question>,
    pub pool_size: usize,
}

impl QuestionDraw {
    /// Number of questions in this draw.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when the pool had nothing to draw from.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Draws a sitting's questions from a test's pool.
///
/// The draw is shuffled by default so every sitting sees a different subset
/// and order; disabling the shuffle keeps pool order, which review flows and
/// tests rely on. A pool smaller than the draw size is taken whole.
pub struct QuestionDrawer {
    draw_size: u32,
    shuffle: bool,
}

impl QuestionDrawer {
    #[must_use]
    pub fn new(draw_size: u32) -> Self {
        Self {
            draw_size,
            shuffle: true,
        }
    }

    /// Enable or disable shuffling before the draw.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn draw(self, pool: impl IntoIterator<Item = Question>) -> QuestionDraw {
        let mut pool: Vec<Question> = pool.into_iter().collect();
        let pool_size = pool.len();

        if self.shuffle {
            pool.as_mut_slice().shuffle(&mut rng());
        }

        let take = usize::try_from(self.draw_size).unwrap_or(usize::MAX);
        pool.truncate(take);

        QuestionDraw {
            questions: pool,
            pool_size,
        }
    }
}
