//! Print-only style overrides for the PDF path.
//!
//! Chromium's print backend rasterises shadows and filters into gray boxes
//! and drops backgrounds unless color adjustment is forced. The stylesheet
//! below neutralises those effects globally, then pins the decorative
//! elements slides rely on to explicit fallbacks so they survive. The image
//! path renders the raw markup and never goes through this module.

const HEAD_CLOSE: &str = "</head>";

/// Attribute identifying the injected block.
pub const PRINT_STYLE_MARKER: &str = "data-slidex-print";

pub const PRINT_DEFECT_CSS: &str = r#"
    <style data-slidex-print>
      * {
        -webkit-print-color-adjust: exact !important;
        color-adjust: exact !important;
        print-color-adjust: exact !important;
      }

      * {
        text-shadow: none !important;
        box-shadow: none !important;
        filter: none !important;
        backdrop-filter: none !important;
      }

      .slide-container {
        margin: 0 !important;
      }

      .icon-and-number-ball {
        background-color: var(--bcg-green) !important;
        background: var(--bcg-green) !important;
      }

      .agenda-item.active .agenda-arrow {
        background-color: var(--bcg-green) !important;
      }

      .agenda-item.inactive .agenda-arrow {
        background-color: var(--bcg-light-gray) !important;
      }

      .icon-and-number-ball-inline {
        background-color: transparent !important;
        border: 2px solid var(--section-title-color) !important;
      }

      .slide-container,
      [style*="gradient"],
      .decorative-left-section,
      .background-overlay,
      .arrow-background-section-left,
      .arrow-background-section-right {
        -webkit-print-color-adjust: exact !important;
        print-color-adjust: exact !important;
      }

      .fas, .far, .fab, .fal {
        -webkit-font-smoothing: antialiased;
        -moz-osx-font-smoothing: grayscale;
        text-rendering: optimizeLegibility;
      }

      /* external background images often fail to load in print */
      .decorative-left-section {
        background-color: var(--bcg-green) !important;
      }

      .background-overlay {
        background-color: rgba(0, 0, 0, 0.3) !important;
      }

      .callout-box, .content-overlay-box {
        background-color: white !important;
        border: 1px solid #ccc !important;
        box-shadow: none !important;
      }
    </style>
  "#;

/// Insert [`PRINT_DEFECT_CSS`] right before the first `</head>`.
///
/// Markup without `</head>` is returned unchanged, as is markup whose first
/// `</head>` is already preceded by the block.
pub fn compensate(html: &str) -> String {
    match html.find(HEAD_CLOSE) {
        Some(idx) if !html[..idx].ends_with(PRINT_DEFECT_CSS) => {
            let mut out = String::with_capacity(html.len() + PRINT_DEFECT_CSS.len());
            out.push_str(&html[..idx]);
            out.push_str(PRINT_DEFECT_CSS);
            out.push_str(&html[idx..]);
            out
        }
        _ => html.to_string(),
    }
}

/// Whether [`PRINT_DEFECT_CSS`] sits right before the first `</head>`.
pub fn is_compensated(html: &str) -> bool {
    html.find(HEAD_CLOSE)
        .is_some_and(|idx| html[..idx].ends_with(PRINT_DEFECT_CSS))
}
