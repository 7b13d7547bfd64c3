use std::path::Path;

use cardgrade_core::measure::{BorderRatios, MeasureLine, MeasureLines};
use cardgrade_core::quad::{Corner, CropQuad};
use cardgrade_core::rectify::OutputSize;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_rectify_summary(
    input: &Path,
    output: &Path,
    source: (u32, u32),
    quad: &CropQuad,
    size: OutputSize,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Rectification"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();
    println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    println!("  {:<14}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.value.apply_to(format!("{}x{}", source.0, source.1))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Card"),
        s.value.apply_to(format!("{}x{}", size.width, size.height))
    );
    println!();

    println!("  {}", s.header.apply_to("Corners"));
    for corner in Corner::ALL {
        let p = quad.get(corner);
        println!(
            "    {:<14}{}",
            s.label.apply_to(corner),
            s.value.apply_to(format!("{:.4}, {:.4}", p.x(), p.y()))
        );
    }
    println!();
}

pub fn print_measure_summary(lines: &MeasureLines, ratios: &BorderRatios) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Centering"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(9)));
    println!();

    println!("  {}", s.header.apply_to("Lines"));
    for line in MeasureLine::ALL {
        println!(
            "    {:<14}{}",
            s.label.apply_to(line),
            s.value.apply_to(format!("{:.2}%", lines.get(line)))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Ratios"));
    print_ratio(&s, "Left/Right", ratios.horizontal.left, ratios.horizontal.right);
    print_ratio(&s, "Top/Bottom", ratios.vertical.top, ratios.vertical.bottom);
    println!();
}

fn print_ratio(s: &Styles, label: &str, a: f64, b: f64) {
    println!(
        "    {:<14}{}",
        s.label.apply_to(label),
        s.value.apply_to(format!("{a:.1} : {b:.1}"))
    );
}
