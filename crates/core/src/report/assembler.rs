//! Document assembler.
//!
//! A single cursor walks the sections in order. Positions are tracked inside
//! the printable area and converted to page coordinates when a block is placed.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::ReportError;
use super::geometry::PageGeometry;
use super::slicing::slice_image;
use super::types::{ArtifactMeta, Block, KeyValue, Page, ReportDocument, Section, SectionBody};

/// Marker printed in place of the rows of an empty table.
pub const NO_RECORDS_MARKER: &str = "No records";

/// Heading level used for section titles.
const SECTION_TITLE_LEVEL: u8 = 2;

/// Most pages a single image may span.
pub const MAX_IMAGE_PAGES: u32 = 1_000;

/// Assembles sections into paginated documents.
pub struct DocumentAssembler {
    geometry: PageGeometry,
}

impl DocumentAssembler {
    /// Creates an assembler after validating the geometry.
    pub fn new(geometry: PageGeometry) -> Result<Self, ReportError> {
        geometry.validate()?;
        Ok(Self { geometry })
    }

    /// Returns the geometry used for layout.
    #[must_use]
    pub const fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lays out `sections` into pages.
    ///
    /// Every image artifact is checked before layout starts, so a failure
    /// never leaves a partially built document behind.
    pub fn assemble(&self, sections: &[Section]) -> Result<ReportDocument, ReportError> {
        let image_limit = self
            .geometry
            .content_height
            .saturating_mul(Decimal::from(MAX_IMAGE_PAGES));
        for section in sections {
            if let SectionBody::Image { artifact } = &section.body
                && self.geometry.rendered_height(artifact)? > image_limit
            {
                return Err(ReportError::unrenderable(artifact));
            }
        }

        let mut layout = Layout::new(&self.geometry);
        for section in sections {
            layout.place_section(section)?;
        }
        let pages = layout.finish();

        info!(
            sections = sections.len(),
            pages = pages.len(),
            "Assembled report document"
        );

        Ok(ReportDocument {
            geometry: self.geometry.clone(),
            pages,
        })
    }
}

/// Mutable layout state for one assembly.
struct Layout<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<Page>,
    current: Vec<Block>,
    cursor: Decimal,
}

impl<'g> Layout<'g> {
    const fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: Decimal::ZERO,
        }
    }

    fn remaining(&self) -> Decimal {
        self.geometry.content_height - self.cursor
    }

    fn top(&self) -> Decimal {
        self.geometry.page_y(self.cursor)
    }

    /// Closes the current page if it holds anything and resets the cursor.
    fn break_page(&mut self) {
        if !self.current.is_empty() {
            let number = u32::try_from(self.pages.len() + 1).unwrap_or(u32::MAX);
            self.pages.push(Page {
                number,
                blocks: std::mem::take(&mut self.current),
            });
        }
        self.cursor = Decimal::ZERO;
    }

    fn ensure_room(&mut self, height: Decimal) {
        if height > self.remaining() {
            self.break_page();
        }
    }

    fn advance(&mut self, height: Decimal) {
        self.cursor = self
            .cursor
            .saturating_add(height)
            .min(self.geometry.content_height);
    }

    fn finish(mut self) -> Vec<Page> {
        self.break_page();
        self.pages
    }

    fn place_section(&mut self, section: &Section) -> Result<(), ReportError> {
        if section.start_on_new_page {
            self.break_page();
        }

        if let Some(title) = &section.title {
            // Keep the title on the same page as the start of its body.
            let lead = self
                .geometry
                .heading_height
                .saturating_add(self.min_body_height(&section.body));
            self.ensure_room(lead);
            self.place_heading(title, SECTION_TITLE_LEVEL);
        }

        match &section.body {
            SectionBody::Heading { text, level } => {
                self.ensure_room(self.geometry.heading_height);
                self.place_heading(text, *level);
            }
            SectionBody::Metrics { header, rows } => {
                self.place_key_value_table(header, rows);
                self.advance(self.geometry.section_gap);
            }
            SectionBody::Table { columns, rows } => {
                self.place_data_table(columns, rows);
                self.advance(self.geometry.section_gap);
            }
            SectionBody::Image { artifact } => {
                self.place_image(artifact)?;
                self.advance(self.geometry.section_gap);
            }
        }

        debug!(
            pages = self.pages.len() + 1,
            cursor = %self.cursor,
            "Placed section"
        );
        Ok(())
    }

    /// Room the body needs right under its title. An image needs at least
    /// one row's height so that a title never ends a page on its own.
    fn min_body_height(&self, body: &SectionBody) -> Decimal {
        match body {
            SectionBody::Heading { .. } => self.geometry.heading_height,
            SectionBody::Metrics { .. } | SectionBody::Table { .. } => self
                .geometry
                .header_height
                .saturating_add(self.geometry.row_height),
            SectionBody::Image { .. } => self.geometry.row_height,
        }
    }

    fn place_heading(&mut self, text: &str, level: u8) {
        self.current.push(Block::Heading {
            text: text.to_string(),
            level,
            top: self.top(),
        });
        self.advance(self.geometry.heading_height);
    }

    fn place_key_value_table(&mut self, header: &KeyValue, rows: &[KeyValue]) {
        self.paginate_rows(rows, |rows, empty_marker, continued, top| {
            Block::KeyValueTable {
                header: header.clone(),
                rows: rows.to_vec(),
                empty_marker,
                continued,
                top,
            }
        });
    }

    fn place_data_table(&mut self, columns: &[String], rows: &[Vec<String>]) {
        self.paginate_rows(rows, |rows, empty_marker, continued, top| Block::DataTable {
            columns: columns.to_vec(),
            rows: rows.to_vec(),
            empty_marker,
            continued,
            top,
        });
    }

    /// Splits `rows` into fragments by row budget, repeating the header on
    /// every page. An empty table still gets its header and a marker row.
    fn paginate_rows<R>(
        &mut self,
        rows: &[R],
        make: impl Fn(&[R], Option<String>, bool, Decimal) -> Block,
    ) {
        let header = self.geometry.header_height;
        let row = self.geometry.row_height;

        if rows.is_empty() {
            let height = header.saturating_add(row);
            self.ensure_room(height);
            let block = make(&[], Some(NO_RECORDS_MARKER.to_string()), false, self.top());
            self.current.push(block);
            self.advance(height);
            return;
        }

        let mut rest = rows;
        let mut continued = false;
        while !rest.is_empty() {
            let fit = self.geometry.rows_fitting(self.remaining());
            if fit == 0 {
                self.break_page();
                continue;
            }

            let take = fit.min(rest.len());
            let (chunk, tail) = rest.split_at(take);
            let block = make(chunk, None, continued, self.top());
            self.current.push(block);
            self.advance(header.saturating_add(row.saturating_mul(Decimal::from(take))));

            debug!(rows = take, continued, "Placed table fragment");

            rest = tail;
            continued = true;
            if !rest.is_empty() {
                self.break_page();
            }
        }
    }

    fn place_image(&mut self, artifact: &ArtifactMeta) -> Result<(), ReportError> {
        let rendered = self.geometry.rendered_height(artifact)?;
        let slices = slice_image(rendered, self.geometry.content_height, self.cursor);

        let mut page_offset = 0;
        for slice in &slices {
            while page_offset < slice.page_offset {
                self.break_page();
                page_offset += 1;
            }
            self.cursor = slice.cursor;
            self.current.push(Block::ImageSlice {
                artifact_id: artifact.id,
                source_offset: slice.source_offset,
                height: slice.height,
                width: self.geometry.content_width,
                rendered_height: rendered,
                top: self.top(),
            });
            self.cursor = slice.end();
        }

        debug!(
            artifact = %artifact.id,
            rendered_height = %rendered,
            slices = slices.len(),
            "Placed image"
        );
        Ok(())
    }
}
