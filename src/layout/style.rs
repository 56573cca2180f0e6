//! Colors, font sizes and spacing used by the report card layout.

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub text: Rgb,
    pub light_gray: Rgb,
    pub border: Rgb,
}

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub heading: f32,
    pub subheading: f32,
    pub body: f32,
    pub small: f32,
}

/// Spacing in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub section: f32,
    pub line: f32,
    pub cell_padding: f32,
    /// Height of the summary box.
    pub summary_box: f32,
    pub border_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Styles {
    pub colors: Palette,
    pub fonts: FontSizes,
    pub spacing: Spacing,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            colors: Palette {
                primary: Rgb(37, 99, 235),
                secondary: Rgb(75, 85, 99),
                text: Rgb(17, 24, 39),
                light_gray: Rgb(243, 244, 246),
                border: Rgb(209, 213, 219),
            },
            fonts: FontSizes {
                title: 18.0,
                heading: 14.0,
                subheading: 12.0,
                body: 10.0,
                small: 8.0,
            },
            spacing: Spacing {
                section: 15.0,
                line: 6.0,
                cell_padding: 2.0,
                summary_box: 40.0,
                border_width: 0.1,
            },
        }
    }
}
