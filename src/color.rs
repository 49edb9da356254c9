//! RGB colors for node and edge rendering
//!
//! Colors arrive from the data layer in whatever form the caller had handy
//! (hex strings, packed integers, float triples) and are normalized here to
//! `[f32; 3]` in the 0.0-1.0 range, which is what the color buffer stores.

use serde::{Deserialize, Serialize};

/// Multiplier applied per "darker" step (matches the d3-color convention)
pub const DARKER: f32 = 0.7;

/// CSS/SVG named colors, sorted by name for binary search.
const NAMED: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

/// An RGB color with channels in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Build from a packed `0xRRGGBB` integer
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self([r, g, b])
    }

    /// Parse a CSS-style color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `rgb()`/`rgba()` with 0-255 or percentage
    /// channels, `hsl()`/`hsla()`, and the CSS named colors. Alpha is
    /// ignored. Returns `None` for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return match hex.len() {
                6 => u32::from_str_radix(hex, 16).ok().map(Self::from_hex),
                3 => {
                    let short = u32::from_str_radix(hex, 16).ok()?;
                    let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                    Some(Self::from_hex((r * 17) << 16 | (g * 17) << 8 | b * 17))
                }
                _ => None,
            };
        }

        if let Some((func, body)) = s.strip_suffix(')').and_then(|rest| rest.split_once('(')) {
            let args: Vec<&str> = body.split(',').map(str::trim).collect();
            return match (func.trim_end(), args.as_slice()) {
                ("rgb", [r, g, b]) | ("rgba", [r, g, b, _]) => {
                    Some(Self([rgb_channel(r)?, rgb_channel(g)?, rgb_channel(b)?]))
                }
                ("hsl", [h, sat, l]) | ("hsla", [h, sat, l, _]) => {
                    let hue = h.strip_suffix("deg").unwrap_or(*h).parse::<f32>().ok()?;
                    Some(Self::from_hsl(hue, percent(sat)?, percent(l)?))
                }
                _ => None,
            };
        }

        NAMED
            .binary_search_by(|(name, _)| name.cmp(&s.as_str()))
            .ok()
            .map(|i| Self::from_hex(NAMED[i].1))
    }

    /// Build from hue in degrees, saturation and lightness in 0.0-1.0
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        if !hue.is_finite() {
            return Self([lightness; 3]);
        }
        let h = hue.rem_euclid(360.0);
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };
        Self([r + m, g + m, b + m])
    }

    /// One perceptual "darker" step.
    ///
    /// Channels are first quantized to 8 bits, then scaled by [`DARKER`], so
    /// the result is a pure function of the input (never cumulative).
    pub fn darker(self) -> Self {
        let [r, g, b] = self.0;
        let step = |c: f32| (c * 255.0).round() * DARKER / 255.0;
        Self([step(r), step(g), step(b)])
    }
}

/// `rgb()` channel: `0-255` or `0%-100%`
fn rgb_channel(value: &str) -> Option<f32> {
    if value.ends_with('%') {
        return percent(value);
    }
    let c = value.parse::<f32>().ok()?;
    (0.0..=255.0).contains(&c).then_some(c / 255.0)
}

/// `N%` in 0-100, as a fraction
fn percent(value: &str) -> Option<f32> {
    let p = value.strip_suffix('%')?.trim().parse::<f32>().ok()?;
    (0.0..=100.0).contains(&p).then_some(p / 100.0)
}

/// Color as written in input data, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Packed `0xRRGGBB`
    Hex(u32),
    /// Float triple in 0.0-1.0
    Triple([f32; 3]),
    /// CSS-style string
    Css(String),
}

impl ColorValue {
    /// Resolve to an [`Rgb`], or `None` if the value is not a recognizable color
    pub fn resolve(&self) -> Option<Rgb> {
        match self {
            ColorValue::Hex(hex) if *hex <= 0xff_ffff => Some(Rgb::from_hex(*hex)),
            ColorValue::Hex(_) => None,
            ColorValue::Triple(rgb) => rgb
                .iter()
                .all(|c| (0.0..=1.0).contains(c))
                .then_some(Rgb(*rgb)),
            ColorValue::Css(s) => Rgb::parse(s),
        }
    }
}

impl std::fmt::Display for ColorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorValue::Hex(hex) => write!(f, "0x{hex:06x}"),
            ColorValue::Triple([r, g, b]) => write!(f, "[{r}, {g}, {b}]"),
            ColorValue::Css(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_hex() {
        assert_eq!(Rgb::parse("#ff0000"), Some(Rgb([1.0, 0.0, 0.0])));
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb([1.0, 1.0, 1.0])));
        assert_eq!(Rgb::parse("#0f0"), Some(Rgb([0.0, 1.0, 0.0])));
    }

    #[test]
    fn parses_rgb_function() {
        assert_eq!(Rgb::parse("rgb(0, 255, 0)"), Some(Rgb([0.0, 1.0, 0.0])));
        assert_eq!(Rgb::parse("rgb(0, 300, 0)"), None);
        assert_eq!(Rgb::parse("rgb(0, 0)"), None);
    }

    #[test]
    fn parses_named_case_insensitive() {
        assert_eq!(Rgb::parse("White"), Some(Rgb([1.0, 1.0, 1.0])));
        assert_eq!(Rgb::parse("chartreuse-ish"), None);
    }

    #[test]
    fn parses_extended_css_names() {
        assert_eq!(Rgb::parse("darkgreen"), Some(Rgb::from_hex(0x006400)));
        assert_eq!(Rgb::parse("RebeccaPurple"), Some(Rgb::from_hex(0x663399)));
        assert_eq!(Rgb::parse("lightgoldenrodyellow"), Some(Rgb::from_hex(0xfafad2)));
        assert_eq!(Rgb::parse("yellowgreen"), Some(Rgb::from_hex(0x9acd32)));
    }

    #[test]
    fn named_table_is_sorted() {
        assert!(NAMED.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn parses_hsl_function() {
        assert_eq!(Rgb::parse("hsl(120, 100%, 25%)"), Some(Rgb([0.0, 0.5, 0.0])));
        assert_eq!(Rgb::parse("hsla(0, 0%, 100%, 0.5)"), Some(Rgb([1.0, 1.0, 1.0])));
        assert_eq!(Rgb::parse("hsl(480deg, 100%, 25%)"), Some(Rgb([0.0, 0.5, 0.0])));
        assert_eq!(Rgb::parse("hsl(120, 100, 25%)"), None);
        assert_eq!(Rgb::parse("hsl(120, 100%)"), None);
    }

    #[test]
    fn parses_rgba_and_percent_channels() {
        assert_eq!(Rgb::parse("rgba(255, 0, 0, 0.2)"), Some(Rgb([1.0, 0.0, 0.0])));
        assert_eq!(Rgb::parse("rgb(100%, 0%, 50%)"), Some(Rgb([1.0, 0.0, 0.5])));
        assert_eq!(Rgb::parse("rgb(0, 0, 101%)"), None);
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gggggg"), None);
    }

    #[test]
    fn darker_scales_quantized_channels() {
        let dark = Rgb([1.0, 0.5, 0.0]).darker();
        assert_eq!(dark.0[0], 255.0 * DARKER / 255.0);
        // 0.5 * 255 = 127.5 rounds to 128
        assert_eq!(dark.0[1], 128.0 * DARKER / 255.0);
        assert_eq!(dark.0[2], 0.0);
    }

    #[test]
    fn darker_is_not_cumulative_from_same_input() {
        let base = Rgb([0.2, 0.4, 0.6]);
        assert_eq!(base.darker(), base.darker());
    }

    #[test]
    fn color_value_deserializes_all_forms() {
        let hex: ColorValue = serde_json::from_str("12245589").unwrap();
        assert_eq!(hex.resolve(), Some(Rgb::from_hex(0xbada55)));

        let triple: ColorValue = serde_json::from_str("[0.0, 0.5, 1.0]").unwrap();
        assert_eq!(triple.resolve(), Some(Rgb([0.0, 0.5, 1.0])));

        let css: ColorValue = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(css.resolve(), Some(Rgb([0.0, 0.0, 0.0])));
    }

    #[test]
    fn out_of_range_values_do_not_resolve() {
        assert_eq!(ColorValue::Hex(0x1_000_000).resolve(), None);
        assert_eq!(ColorValue::Triple([0.0, 2.0, 0.0]).resolve(), None);
    }
}
