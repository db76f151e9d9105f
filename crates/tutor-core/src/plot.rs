//! Function plots rendered to PNG data URIs.
//!
//! [`render_function_plot`] is the whole pipeline: validate the request,
//! sample the expression on [`SAMPLE_COUNT`] points, rasterize the curve with
//! the plotters bitmap backend, encode the pixels as PNG and wrap them in a
//! `media_image` [`Block`].
//!
//! The chart carries no text (title or tick labels); the frontend renders
//! those around the image.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;

use crate::block::Block;
use crate::error::PlotError;
use crate::expr::{definition_rhs, Expr, Samples};

/// Points sampled across the requested domain.
pub const SAMPLE_COUNT: usize = 1000;

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;

const BACKGROUND: RGBColor = RGBColor(0x18, 0x19, 0x2A);
const CURVE: RGBColor = RGBColor(0xFF, 0xD2, 0x46);
const AXIS: RGBColor = RGBColor(0x87, 0xCE, 0xEB);
const GRID: RGBColor = RGBColor(0xFF, 0xFF, 0xFF);
const GRID_DIVISIONS: usize = 10;

/// Validates a plot request and samples its expression.
///
/// Checks run in order: non-empty text, finite bounds and span, `x_min < x_max`,
/// `f(x) = ...` pattern, expression syntax.
pub fn sample_function(text: &str, x_min: f64, x_max: f64) -> Result<Samples, PlotError> {
    if text.trim().is_empty() {
        return Err(PlotError::InvalidFormat);
    }
    if !x_min.is_finite() || !x_max.is_finite() || !(x_max - x_min).is_finite() {
        return Err(PlotError::NonFiniteDomain);
    }
    if x_min >= x_max {
        return Err(PlotError::EmptyDomain);
    }
    let rhs = definition_rhs(text).ok_or(PlotError::InvalidFormat)?;
    let expr = Expr::parse(rhs)?;
    Ok(expr.sample(x_min, x_max, SAMPLE_COUNT))
}

/// Plots `f(x) = ...` over `[x_min, x_max]` as a `media_image` block.
pub fn render_function_plot(text: &str, x_min: f64, x_max: f64) -> Result<Block, PlotError> {
    let samples = sample_function(text, x_min, x_max)?;
    let png = render_png(&samples)?;
    Ok(Block::media_image(png_data_uri(&png)))
}

/// `data:image/png;base64,...` URI for raw PNG bytes.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Rasterizes sampled values to PNG bytes.
pub fn render_png(samples: &Samples) -> Result<Vec<u8>, PlotError> {
    let (y_min, y_max) = samples.finite_range().ok_or(PlotError::NoFiniteValues)?;
    let (y_lo, y_hi) = padded_range(y_min, y_max);
    let (x_lo, x_hi) = match (samples.xs.first(), samples.xs.last()) {
        (Some(&lo), Some(&hi)) if lo < hi => (lo, hi),
        (Some(&lo), _) => (lo - 1.0, lo + 1.0),
        _ => return Err(PlotError::NoFiniteValues),
    };

    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&BACKGROUND).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(24)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        let grid = GRID.mix(0.2).stroke_width(1);
        for x in grid_lines(x_lo, x_hi) {
            chart
                .draw_series(LineSeries::new([(x, y_lo), (x, y_hi)], grid))
                .map_err(render_err)?;
        }
        for y in grid_lines(y_lo, y_hi) {
            chart
                .draw_series(LineSeries::new([(x_lo, y), (x_hi, y)], grid))
                .map_err(render_err)?;
        }

        let axis = AXIS.mix(0.8).stroke_width(1);
        if x_lo <= 0.0 && 0.0 <= x_hi {
            chart
                .draw_series(LineSeries::new([(0.0, y_lo), (0.0, y_hi)], axis))
                .map_err(render_err)?;
        }
        if y_lo <= 0.0 && 0.0 <= y_hi {
            chart
                .draw_series(LineSeries::new([(x_lo, 0.0), (x_hi, 0.0)], axis))
                .map_err(render_err)?;
        }

        for segment in samples.finite_segments() {
            chart
                .draw_series(LineSeries::new(segment, CURVE.stroke_width(2)))
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&pixels, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .map_err(|err| PlotError::Encode(err.to_string()))?;
    Ok(png)
}

/// Widens `[lo, hi]` by 5% on each side; a flat range gets one unit of room.
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    // Scaled before subtracting so huge ranges stay finite.
    let pad = hi * 0.05 - lo * 0.05;
    ((lo - pad).max(f64::MIN), (hi + pad).min(f64::MAX))
}

/// Interior grid positions splitting `[lo, hi]` into equal divisions.
fn grid_lines(lo: f64, hi: f64) -> impl Iterator<Item = f64> {
    (1..GRID_DIVISIONS).map(move |i| {
        let t = i as f64 / GRID_DIVISIONS as f64;
        lo * (1.0 - t) + hi * t
    })
}

fn render_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprError;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn square_over_unit_domain_has_1000_samples() {
        let samples = sample_function("f(x) = x^2", -1.0, 1.0).unwrap();
        assert_eq!(samples.len(), SAMPLE_COUNT);
        assert_eq!(samples.xs[0], -1.0);
        assert_eq!(samples.xs[SAMPLE_COUNT - 1], 1.0);
        for (x, y) in samples.xs.iter().zip(&samples.ys) {
            assert!((y - x * x).abs() < 1e-12);
        }
    }

    #[test]
    fn reversed_or_empty_domain_is_rejected() {
        assert!(matches!(
            sample_function("f(x) = x", 1.0, 1.0),
            Err(PlotError::EmptyDomain)
        ));
        assert!(matches!(
            sample_function("f(x) = x", 2.0, -2.0),
            Err(PlotError::EmptyDomain)
        ));
        assert!(matches!(
            sample_function("f(x) = x", f64::NAN, 1.0),
            Err(PlotError::NonFiniteDomain)
        ));
        assert!(matches!(
            sample_function("f(x) = x", -1.7e308, 1.7e308),
            Err(PlotError::NonFiniteDomain)
        ));
    }

    #[test]
    fn deep_nesting_is_a_client_error() {
        let text = format!("f(x) = {}x{}", "(".repeat(300), ")".repeat(300));
        let err = sample_function(&text, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PlotError::Evaluation(ExprError::TooDeep { .. })
        ));
        assert!(err.is_client_error());
    }

    #[test]
    fn huge_values_keep_a_finite_frame() {
        let (lo, hi) = padded_range(-f64::MAX, f64::MAX);
        assert!(lo.is_finite() && hi.is_finite());
        assert!(grid_lines(lo, hi).all(f64::is_finite));
    }

    #[test]
    fn missing_definition_is_invalid_format() {
        assert!(matches!(sample_function("", 0.0, 1.0), Err(PlotError::InvalidFormat)));
        assert!(matches!(
            sample_function("x^2", 0.0, 1.0),
            Err(PlotError::InvalidFormat)
        ));
        assert!(matches!(
            sample_function("g(x) = x^2", 0.0, 1.0),
            Err(PlotError::InvalidFormat)
        ));
    }

    #[test]
    fn domain_checked_before_format() {
        assert!(matches!(
            sample_function("no definition here", 1.0, 0.0),
            Err(PlotError::EmptyDomain)
        ));
    }

    #[test]
    fn parse_failures_surface_as_evaluation_errors() {
        let err = sample_function("f(x) = foo(x)", 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PlotError::Evaluation(ExprError::UnknownName { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Error evaluating function: name 'foo' is not defined"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn renders_png_data_uri() {
        let block = render_function_plot("f(x) = sin(x/2)", -3.0, 3.0).unwrap();
        assert!(block.is_image());
        let payload = block
            .text
            .strip_prefix("data:image/png;base64,")
            .expect("data uri prefix");
        let png = BASE64.decode(payload).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn curve_with_gaps_still_renders() {
        let png = render_png(&sample_function("f(x) = sqrt(x)", -2.0, 2.0).unwrap()).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn constant_function_renders() {
        let png = render_png(&sample_function("f(x) = 3", 0.0, 1.0).unwrap()).unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn nowhere_finite_function_is_rejected() {
        let samples = sample_function("f(x) = ln(x)", -3.0, -1.0).unwrap();
        assert!(matches!(render_png(&samples), Err(PlotError::NoFiniteValues)));
    }

    #[test]
    fn padded_range_handles_flat_values() {
        assert_eq!(padded_range(3.0, 3.0), (2.0, 4.0));
        let (lo, hi) = padded_range(0.0, 10.0);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }
}
