//! Physical page formats, orientation and margins.
//!
//! All measurements are PDF points (1/72 inch). The named formats mirror the
//! values report definitions have always used, rounded to two decimals, so a
//! layout computed here lines up with the one the HTML and PDF emitters
//! produce.

use std::fmt;
use std::str::FromStr;

use crate::error::{ReportError, Result};

/// Smallest accepted custom page dimension.
pub const MIN_CUSTOM_DIMENSION: f64 = 10.0;

const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Converts points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points * MM_PER_POINT
}

/// Converts millimetres to points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_POINT
}

/// Width and height of a page in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl PageSize {
    /// Creates a page size from explicit dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Applies the orientation, swapping the dimensions for landscape.
    pub fn oriented(self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => self,
            Orientation::Landscape => Self::new(self.height, self.width),
        }
    }
}

/// Named physical page formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageFormat {
    /// ISO 216, 1682 x 2378 mm.
    FourA0,
    /// ISO 216, 1189 x 1682 mm.
    TwoA0,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    A9,
    A10,
    /// ISO 269 C6/5 envelope, 110 x 220 mm.
    Dl,
    /// 7.25 x 10.5 in.
    Executive,
    /// 8.5 x 13 in.
    Folio,
    /// 13.5 x 17 in.
    Foolscap,
    /// 11 x 17 in.
    Ledger,
    /// 8.5 x 14 in.
    Legal,
    /// 8.5 x 11 in.
    Letter,
    /// 8.46 x 10.8 in.
    Quarto,
    /// 5.5 x 8.5 in.
    Statement,
    /// 8 x 11 in.
    UsGovt,
    /// Caller supplied dimensions, validated by [`validate_custom`].
    Custom {
        /// Width in points.
        width: f64,
        /// Height in points.
        height: f64,
    },
}

impl PageFormat {
    /// Every named format in table order.
    pub const NAMED: [PageFormat; 23] = [
        PageFormat::FourA0,
        PageFormat::TwoA0,
        PageFormat::A0,
        PageFormat::A1,
        PageFormat::A2,
        PageFormat::A3,
        PageFormat::A4,
        PageFormat::A5,
        PageFormat::A6,
        PageFormat::A7,
        PageFormat::A8,
        PageFormat::A9,
        PageFormat::A10,
        PageFormat::Dl,
        PageFormat::Executive,
        PageFormat::Folio,
        PageFormat::Foolscap,
        PageFormat::Ledger,
        PageFormat::Legal,
        PageFormat::Letter,
        PageFormat::Quarto,
        PageFormat::Statement,
        PageFormat::UsGovt,
    ];

    /// Portrait dimensions of the format.
    pub fn dimensions(self) -> PageSize {
        let (width, height) = match self {
            PageFormat::FourA0 => (4767.86, 6740.79),
            PageFormat::TwoA0 => (3370.39, 4767.86),
            PageFormat::A0 => (2383.94, 3370.39),
            PageFormat::A1 => (1683.78, 2383.94),
            PageFormat::A2 => (1190.55, 1683.78),
            PageFormat::A3 => (841.89, 1190.55),
            PageFormat::A4 => (595.28, 841.89),
            PageFormat::A5 => (419.53, 595.28),
            PageFormat::A6 => (297.64, 419.53),
            PageFormat::A7 => (209.76, 297.64),
            PageFormat::A8 => (147.40, 209.76),
            PageFormat::A9 => (104.88, 147.40),
            PageFormat::A10 => (73.70, 104.88),
            PageFormat::Dl => (311.81, 623.62),
            PageFormat::Executive => (522.00, 756.00),
            PageFormat::Folio => (612.00, 936.00),
            PageFormat::Foolscap => (972.00, 1224.00),
            PageFormat::Ledger => (792.00, 1224.00),
            PageFormat::Legal => (612.00, 1008.00),
            PageFormat::Letter => (612.00, 792.00),
            PageFormat::Quarto => (609.12, 777.50),
            PageFormat::Statement => (396.00, 612.00),
            PageFormat::UsGovt => (576.00, 792.00),
            PageFormat::Custom { width, height } => (width, height),
        };
        PageSize::new(width, height)
    }

    /// Name used by report definitions.
    pub fn name(self) -> &'static str {
        match self {
            PageFormat::FourA0 => "4A0",
            PageFormat::TwoA0 => "2A0",
            PageFormat::A0 => "A0",
            PageFormat::A1 => "A1",
            PageFormat::A2 => "A2",
            PageFormat::A3 => "A3",
            PageFormat::A4 => "A4",
            PageFormat::A5 => "A5",
            PageFormat::A6 => "A6",
            PageFormat::A7 => "A7",
            PageFormat::A8 => "A8",
            PageFormat::A9 => "A9",
            PageFormat::A10 => "A10",
            PageFormat::Dl => "DL",
            PageFormat::Executive => "EXECUTIVE",
            PageFormat::Folio => "FOLIO",
            PageFormat::Foolscap => "FOOLSCAP",
            PageFormat::Ledger => "LEDGER",
            PageFormat::Legal => "LEGAL",
            PageFormat::Letter => "LETTER",
            PageFormat::Quarto => "QUARTO",
            PageFormat::Statement => "STATEMENT",
            PageFormat::UsGovt => "USGOVT",
            PageFormat::Custom { .. } => "CUSTOM",
        }
    }

    /// Looks up a named format. Unknown names resolve to A4.
    pub fn from_name(name: &str) -> Self {
        let wanted = name.trim();
        Self::NAMED
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .unwrap_or_else(|| {
                log::debug!("unknown page format {wanted:?}, using A4");
                PageFormat::A4
            })
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        PageFormat::A4
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::Custom { width, height } => write!(f, "{width}x{height}pt"),
            named => f.write_str(named.name()),
        }
    }
}

/// Resolves a format name to portrait dimensions, falling back to A4.
pub fn resolve(format_name: &str) -> PageSize {
    PageFormat::from_name(format_name).dimensions()
}

/// Checks custom page dimensions, returning them unchanged when valid.
pub fn validate_custom(width: f64, height: f64) -> Result<PageSize> {
    if width < MIN_CUSTOM_DIMENSION {
        return Err(ReportError::InvalidGeometry {
            dimension: "customwidth",
            value: width,
        });
    }
    if height < MIN_CUSTOM_DIMENSION {
        return Err(ReportError::InvalidGeometry {
            dimension: "customheight",
            value: height,
        });
    }
    Ok(PageSize::new(width, height))
}

/// Page orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = std::convert::Infallible;

    /// Accepts `landscape` or `L` (any case); everything else is portrait.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("landscape") || value.eq_ignore_ascii_case("l") {
            Ok(Orientation::Landscape)
        } else {
            Ok(Orientation::Portrait)
        }
    }
}

/// Page margins in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// Distance from the top edge to the document header.
    pub header: f64,
    /// Distance from the bottom edge to the end of the document footer.
    pub footer: f64,
}

impl Margins {
    /// Creates margins from all six values.
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64, header: f64, footer: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            header,
            footer,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(51.0, 28.0, 76.0, 60.0, 14.0, 28.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    #[test]
    fn every_named_format_round_trips_through_its_name() {
        for format in PageFormat::NAMED {
            assert_eq!(PageFormat::from_name(format.name()), format);
        }
    }

    #[test]
    fn named_formats_resolve_to_documented_sizes() {
        let expected = [
            ("4A0", 4767.86, 6740.79),
            ("2A0", 3370.39, 4767.86),
            ("A0", 2383.94, 3370.39),
            ("A1", 1683.78, 2383.94),
            ("A2", 1190.55, 1683.78),
            ("A3", 841.89, 1190.55),
            ("A4", 595.28, 841.89),
            ("A5", 419.53, 595.28),
            ("A6", 297.64, 419.53),
            ("A7", 209.76, 297.64),
            ("A8", 147.40, 209.76),
            ("A9", 104.88, 147.40),
            ("A10", 73.70, 104.88),
            ("DL", 311.81, 623.62),
            ("EXECUTIVE", 522.00, 756.00),
            ("FOLIO", 612.00, 936.00),
            ("FOOLSCAP", 972.00, 1224.00),
            ("LEDGER", 792.00, 1224.00),
            ("LEGAL", 612.00, 1008.00),
            ("LETTER", 612.00, 792.00),
            ("QUARTO", 609.12, 777.50),
            ("STATEMENT", 396.00, 612.00),
            ("USGOVT", 576.00, 792.00),
        ];

        for (name, width, height) in expected {
            let size = resolve(name);
            assert_eq!(round2(size.width), width, "{name} width");
            assert_eq!(round2(size.height), height, "{name} height");
        }
    }

    #[test]
    fn unknown_format_falls_back_to_a4() {
        assert_eq!(resolve("B5"), PageSize::new(595.28, 841.89));
        assert_eq!(resolve(""), PageSize::new(595.28, 841.89));
    }

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(PageFormat::from_name("letter"), PageFormat::Letter);
        assert_eq!(PageFormat::from_name(" a3 "), PageFormat::A3);
    }

    #[test]
    fn custom_sizes_below_minimum_are_rejected() {
        assert!(matches!(
            validate_custom(9.99, 500.0),
            Err(ReportError::InvalidGeometry {
                dimension: "customwidth",
                ..
            })
        ));
        assert!(matches!(
            validate_custom(500.0, 2.0),
            Err(ReportError::InvalidGeometry {
                dimension: "customheight",
                ..
            })
        ));
    }

    #[test]
    fn custom_sizes_at_or_above_minimum_are_preserved() {
        assert_eq!(validate_custom(10.0, 10.0).unwrap(), PageSize::new(10.0, 10.0));
        assert_eq!(validate_custom(300.5, 420.25).unwrap(), PageSize::new(300.5, 420.25));
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let portrait = resolve("A4");
        assert_eq!(portrait, PageSize::new(595.28, 841.89));
        assert_eq!(
            portrait.oriented(Orientation::Landscape),
            PageSize::new(841.89, 595.28)
        );
        assert_eq!(portrait.oriented(Orientation::Portrait), portrait);
    }

    #[test]
    fn orientation_parsing_defaults_to_portrait() {
        assert_eq!("landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("L".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("sideways".parse::<Orientation>().unwrap(), Orientation::Portrait);
    }

    #[test]
    fn unit_conversion_is_symmetric() {
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-9);
        assert!((mm_to_pt(pt_to_mm(595.28)) - 595.28).abs() < 1e-9);
    }
}
