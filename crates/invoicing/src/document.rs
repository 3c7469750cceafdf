//! Paged document export for invoices.
//!
//! The invoice view is captured as one tall raster image, then split into
//! portrait page bands. Capture and page encoding are external concerns:
//! the raster arrives ready-made and the encoder is driven through the
//! [`DocumentEncoder`] trait.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default portrait page width in millimetres.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// Default portrait page height in millimetres.
pub const PAGE_HEIGHT_MM: f64 = 295.0;

/// Portrait page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
        }
    }
}

/// One page band of the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSlice {
    pub page_index: u32,
    /// Vertical pixel offset into the source raster where this page begins.
    pub source_y_offset_px: f64,
}

impl PageSlice {
    /// Draw offset in millimetres for encoders that place the full raster
    /// shifted upward on each page: 0 for the first page, then increasingly
    /// negative.
    pub fn draw_offset_mm(&self, layout: PageLayout) -> f64 {
        -(self.page_index as f64) * layout.page_height_mm
    }
}

/// Split a raster into page bands.
///
/// The raster is scaled to the page width; the scaled height in millimetres
/// then fills pages top to bottom. The number of slices is exactly
/// `ceil(scaled_height / page_height)`: a raster that fits one page emits a
/// single slice, an exact multiple of the page height emits no trailing
/// empty page. A raster with a zero dimension yields no slices at all.
pub fn paginate(
    raster_width_px: u32,
    raster_height_px: u32,
    layout: PageLayout,
) -> Vec<PageSlice> {
    if raster_width_px == 0 || raster_height_px == 0 {
        return Vec::new();
    }
    if layout.page_width_mm <= 0.0 || layout.page_height_mm <= 0.0 {
        return Vec::new();
    }

    let scaled_height_mm =
        raster_height_px as f64 * layout.page_width_mm / raster_width_px as f64;
    let px_per_mm = raster_width_px as f64 / layout.page_width_mm;

    let mut slices = vec![PageSlice {
        page_index: 0,
        source_y_offset_px: 0.0,
    }];
    let mut remaining_mm = scaled_height_mm - layout.page_height_mm;
    while remaining_mm > 0.0 {
        let page_index = slices.len() as u32;
        slices.push(PageSlice {
            page_index,
            source_y_offset_px: page_index as f64 * layout.page_height_mm * px_per_mm,
        });
        remaining_mm -= layout.page_height_mm;
    }
    slices
}

/// Rasterized invoice image handed over by the capture boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRaster {
    pub width_px: u32,
    pub height_px: u32,
    /// Encoded image bytes (e.g. PNG); opaque to the paginator.
    pub bytes: Vec<u8>,
}

/// Failure inside a [`DocumentEncoder`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("document encoding failed: {0}")]
pub struct EncodeError(pub String);

/// Black-box page encoder (e.g. a PDF writer).
pub trait DocumentEncoder {
    /// Render one page band of the raster.
    fn add_page(
        &mut self,
        raster: &InvoiceRaster,
        slice: PageSlice,
        layout: PageLayout,
    ) -> Result<(), EncodeError>;

    /// Finish and return the encoded document bytes.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, EncodeError>;
}

/// A finished export: suggested download name plus document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Download name for an exported invoice.
pub fn document_file_name(serial_number: &str) -> String {
    format!("invoice-{serial_number}.pdf")
}

/// Drive the encoder over every page band of the raster.
///
/// Returns `None` when there is nothing to export (absent or zero-sized
/// raster) and when the encoder fails; failures are logged and no partial
/// document is handed out.
pub fn export_document(
    raster: Option<&InvoiceRaster>,
    serial_number: &str,
    layout: PageLayout,
    mut encoder: Box<dyn DocumentEncoder>,
) -> Option<ExportedDocument> {
    let raster = raster?;
    let slices = paginate(raster.width_px, raster.height_px, layout);
    if slices.is_empty() {
        return None;
    }

    for slice in slices {
        if let Err(err) = encoder.add_page(raster, slice, layout) {
            tracing::error!(
                serial = %serial_number,
                page = slice.page_index,
                error = %err,
                "invoice document encoding failed"
            );
            return None;
        }
    }

    match encoder.finish() {
        Ok(bytes) => Some(ExportedDocument {
            file_name: document_file_name(serial_number),
            bytes,
        }),
        Err(err) => {
            tracing::error!(serial = %serial_number, error = %err, "invoice document encoding failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encoder stub; `finish` reports how many pages were added.
    #[derive(Debug, Default)]
    struct CountingEncoder {
        pages: Vec<PageSlice>,
        fail_on_page: Option<u32>,
        fail_on_finish: bool,
    }

    impl DocumentEncoder for CountingEncoder {
        fn add_page(
            &mut self,
            _raster: &InvoiceRaster,
            slice: PageSlice,
            _layout: PageLayout,
        ) -> Result<(), EncodeError> {
            if self.fail_on_page == Some(slice.page_index) {
                return Err(EncodeError("page band rejected".to_string()));
            }
            self.pages.push(slice);
            Ok(())
        }

        fn finish(self: Box<Self>) -> Result<Vec<u8>, EncodeError> {
            if self.fail_on_finish {
                return Err(EncodeError("writer closed early".to_string()));
            }
            Ok(format!("PDF:{}", self.pages.len()).into_bytes())
        }
    }

    fn test_raster(width_px: u32, height_px: u32) -> InvoiceRaster {
        InvoiceRaster {
            width_px,
            height_px,
            bytes: vec![0u8; 4],
        }
    }

    #[test]
    fn square_raster_fits_one_page() {
        let slices = paginate(1000, 1000, PageLayout::default());
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].page_index, 0);
        assert_eq!(slices[0].source_y_offset_px, 0.0);
    }

    #[test]
    fn tall_raster_spills_onto_following_pages() {
        // 210px wide means 1px = 1mm: scaled height 600mm over 295mm pages.
        let slices = paginate(210, 600, PageLayout::default());
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].source_y_offset_px, 295.0);
        assert_eq!(slices[2].source_y_offset_px, 590.0);
    }

    #[test]
    fn exact_page_multiple_emits_no_trailing_page() {
        // Scaled height is exactly two pages.
        let slices = paginate(210, 590, PageLayout::default());
        assert_eq!(slices.len(), 2);

        // And exactly one page.
        let slices = paginate(210, 295, PageLayout::default());
        assert_eq!(slices.len(), 1);
    }

    #[test]
    fn zero_sized_raster_yields_no_slices() {
        assert!(paginate(0, 1000, PageLayout::default()).is_empty());
        assert!(paginate(1000, 0, PageLayout::default()).is_empty());
    }

    #[test]
    fn draw_offset_descends_one_page_height_per_page() {
        let layout = PageLayout::default();
        let slices = paginate(210, 600, layout);
        assert_eq!(slices[0].draw_offset_mm(layout), 0.0);
        assert_eq!(slices[1].draw_offset_mm(layout), -295.0);
        assert_eq!(slices[2].draw_offset_mm(layout), -590.0);
    }

    #[test]
    fn export_encodes_every_page() {
        let raster = test_raster(210, 600);
        let exported = export_document(
            Some(&raster),
            "INV-123456",
            PageLayout::default(),
            Box::new(CountingEncoder::default()),
        )
        .unwrap();

        assert_eq!(exported.file_name, "invoice-INV-123456.pdf");
        assert_eq!(exported.bytes, b"PDF:3");
    }

    #[test]
    fn export_without_raster_is_a_noop() {
        let exported = export_document(
            None,
            "INV-123456",
            PageLayout::default(),
            Box::new(CountingEncoder::default()),
        );
        assert!(exported.is_none());
    }

    #[test]
    fn export_of_empty_raster_is_a_noop() {
        let raster = test_raster(0, 0);
        let exported = export_document(
            Some(&raster),
            "INV-123456",
            PageLayout::default(),
            Box::new(CountingEncoder::default()),
        );
        assert!(exported.is_none());
    }

    #[test]
    fn encoder_failure_yields_no_partial_document() {
        let raster = test_raster(210, 600);

        let failing_page = CountingEncoder {
            fail_on_page: Some(1),
            ..CountingEncoder::default()
        };
        assert!(
            export_document(
                Some(&raster),
                "INV-123456",
                PageLayout::default(),
                Box::new(failing_page),
            )
            .is_none()
        );

        let failing_finish = CountingEncoder {
            fail_on_finish: true,
            ..CountingEncoder::default()
        };
        assert!(
            export_document(
                Some(&raster),
                "INV-123456",
                PageLayout::default(),
                Box::new(failing_finish),
            )
            .is_none()
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            #[test]
            fn slice_count_matches_scaled_height_ceiling(
                width in 1u32..4000,
                height in 1u32..40_000,
            ) {
                let layout = PageLayout::default();
                let slices = paginate(width, height, layout);

                let scaled_height_mm = height as f64 * layout.page_width_mm / width as f64;
                let expected = (scaled_height_mm / layout.page_height_mm).ceil() as usize;
                prop_assert_eq!(slices.len(), expected.max(1));
            }

            #[test]
            fn offsets_ascend_and_stay_inside_the_raster(
                width in 1u32..4000,
                height in 1u32..40_000,
            ) {
                let layout = PageLayout::default();
                let slices = paginate(width, height, layout);

                let mut last = -1.0f64;
                for slice in &slices {
                    prop_assert!(slice.source_y_offset_px > last);
                    prop_assert!(slice.source_y_offset_px < height as f64);
                    last = slice.source_y_offset_px;
                }
            }

            #[test]
            fn page_indices_are_dense(width in 1u32..4000, height in 1u32..40_000) {
                let slices = paginate(width, height, PageLayout::default());
                for (i, slice) in slices.iter().enumerate() {
                    prop_assert_eq!(slice.page_index as usize, i);
                }
            }
        }
    }
}
