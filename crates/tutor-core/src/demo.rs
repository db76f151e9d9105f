//! Canned pedagogical responses used when no agent answers.
//!
//! A few literal inputs get a fixed answer so demos are reproducible; anything
//! else draws from a small pool. Randomness is always supplied by the caller.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::block::Block;
use crate::error::PlotError;
use crate::expr::is_definition;
use crate::plot::render_function_plot;

/// Predefined course snippets.
pub const PREDEFINED_RESPONSES: [&str; 3] = [
    "Un électron est une particule élémentaire de charge négative.",
    "La dérivée d'une fonction mesure la variation instantanée.",
    "La photosynthèse est le processus par lequel les plantes produisent de l'énergie.",
];

/// Functions drawn for the `"Graph"` demo.
pub const GRAPH_TEMPLATES: [&str; 3] = ["f(x)=x^2-5", "f(x)=sin(x/2)", "f(x)=exp(x+1)"];

/// Domain used by every demo plot.
pub const DEMO_DOMAIN: (f64, f64) = (-3.0, 3.0);

/// Picks the demo answer for `text`.
///
/// - `f(x) = ...` anywhere in the text: that function, plotted on [`DEMO_DOMAIN`]
/// - `"Physics"` / `"Maths"`: the first / second predefined snippet
/// - `"Graph"`: a random [`GRAPH_TEMPLATES`] plot
/// - anything else: a random predefined snippet
pub fn demo_response<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Result<Block, PlotError> {
    if is_definition(text) {
        return render_function_plot(text, DEMO_DOMAIN.0, DEMO_DOMAIN.1);
    }

    match text {
        "Physics" => Ok(Block::cours(PREDEFINED_RESPONSES[0])),
        "Maths" => Ok(Block::cours(PREDEFINED_RESPONSES[1])),
        "Graph" => random_plot(rng),
        _ => Ok(random_text(rng)),
    }
}

/// A uniformly chosen predefined snippet.
pub fn random_text<R: Rng + ?Sized>(rng: &mut R) -> Block {
    let text = PREDEFINED_RESPONSES
        .choose(rng)
        .copied()
        .unwrap_or(PREDEFINED_RESPONSES[0]);
    Block::cours(text)
}

/// A plot of a uniformly chosen template.
pub fn random_plot<R: Rng + ?Sized>(rng: &mut R) -> Result<Block, PlotError> {
    let template = GRAPH_TEMPLATES
        .choose(rng)
        .copied()
        .unwrap_or(GRAPH_TEMPLATES[0]);
    render_function_plot(template, DEMO_DOMAIN.0, DEMO_DOMAIN.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BALISE_COURS, BALISE_MEDIA_IMAGE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn literal_subjects_are_deterministic() {
        let mut rng = rng();
        for _ in 0..5 {
            assert_eq!(
                demo_response("Physics", &mut rng).unwrap(),
                Block::cours(PREDEFINED_RESPONSES[0])
            );
            assert_eq!(
                demo_response("Maths", &mut rng).unwrap(),
                Block::cours(PREDEFINED_RESPONSES[1])
            );
        }
    }

    #[test]
    fn definitions_are_plotted() {
        let block = demo_response("please draw f(x) = x^3", &mut rng()).unwrap();
        assert_eq!(block.balise, BALISE_MEDIA_IMAGE);
        assert!(block.text.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn malformed_definition_is_an_error() {
        let err = demo_response("f(x) = x +", &mut rng()).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn graph_returns_an_image() {
        let block = demo_response("Graph", &mut rng()).unwrap();
        assert!(block.is_image());
    }

    #[test]
    fn other_text_picks_from_the_pool() {
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let block = demo_response("hello", &mut rng).unwrap();
            assert_eq!(block.balise, BALISE_COURS);
            assert!(PREDEFINED_RESPONSES.contains(&block.text.as_str()));
            seen.insert(block.text);
        }
        assert_eq!(seen.len(), PREDEFINED_RESPONSES.len());
    }

    #[test]
    fn all_graph_templates_render() {
        for template in GRAPH_TEMPLATES {
            assert!(render_function_plot(template, DEMO_DOMAIN.0, DEMO_DOMAIN.1).is_ok());
        }
    }
}
