// Random sampling of candidate pools.
//
// `extract_sample` is the single down-sampling primitive every relation
// query funnels through: either a full shuffle (no sample size, or the
// pool is small enough) or a duplicate-free random subset of exactly the
// requested size.

use rand::Rng;
use rand::seq::SliceRandom;

/// Return a random sample from the word list, or a shuffled copy.
///
/// With `sample_size` of `None` (or zero, or at least the population size)
/// the whole list comes back shuffled. Otherwise the result is a
/// duplicate-free subset of `sample_size` elements in random order.
pub fn extract_sample(
    mut words: Vec<String>,
    sample_size: Option<usize>,
    rng: &mut impl Rng,
) -> Vec<String> {
    words.shuffle(rng);
    match sample_size {
        Some(n) if n > 0 && words.len() > n => {
            let mut sample: Vec<String> = Vec::with_capacity(n);
            for word in words {
                if !sample.contains(&word) {
                    sample.push(word);
                    if sample.len() == n {
                        break;
                    }
                }
            }
            sample
        }
        _ => words,
    }
}
