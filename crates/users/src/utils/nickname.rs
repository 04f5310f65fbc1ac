//! Random nickname generation.

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &["clever", "jolly", "brave", "sly", "gentle"];
const ANIMALS: &[&str] = &["panda", "fox", "raccoon", "koala", "lion"];

/// Produce `<adjective>_<animal>_<number>` with a number in `0..=999`.
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("clever");
    let animal = ANIMALS.choose(&mut rng).copied().unwrap_or("panda");
    let number: u16 = rng.gen_range(0..=999);
    format!("{adjective}_{animal}_{number}")
}
