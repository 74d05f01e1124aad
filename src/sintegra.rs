//! File assembler - single entry point for rendering a Sintegra file
//!
//! Blocks are rendered in canonical order and the totalizer is always appended;
//! there is no way to obtain a body without its trailer.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::block::{Block, BlockKind};
use crate::config::LayoutConfig;
use crate::error::{Result, SintegraError};
use crate::hashing::FileManifest;
use crate::totals::{totalize, trailer_prefix, Trailer};

#[derive(Debug, Clone, Default)]
pub struct Sintegra {
    blocks: BTreeMap<BlockKind, Block>,
    config: LayoutConfig,
}

impl Sintegra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut sintegra = Self::new();
        for block in blocks {
            sintegra.add_block(block);
        }
        sintegra
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Add `block`, replacing any block of the same kind.
    pub fn add_block(&mut self, block: Block) -> &mut Self {
        self.blocks.insert(block.kind(), block);
        self
    }

    pub fn block(&self, kind: BlockKind) -> Option<&Block> {
        self.blocks.get(&kind)
    }

    /// Every block in canonical order, without the trailer.
    pub fn body(&self) -> String {
        self.blocks
            .values()
            .map(|block| block.render_with(&self.config.line_terminator))
            .collect()
    }

    pub fn trailer(&self) -> Result<Trailer> {
        self.trailer_for(&self.body())
    }

    fn trailer_for(&self, body: &str) -> Result<Trailer> {
        let master = self
            .blocks
            .values()
            .next()
            .and_then(|block| block.elements().first());
        let prefix = trailer_prefix(master).inspect_err(|_| {
            warn!("first block does not open with a registro 10");
        })?;
        Ok(totalize(body, &prefix, &self.config))
    }

    pub fn render(&self) -> Result<String> {
        self.render_with_trailer().map(|(text, _)| text)
    }

    fn render_with_trailer(&self) -> Result<(String, Trailer)> {
        let mut text = self.body();
        let trailer = self.trailer_for(&text)?;
        text.push_str(&trailer.render(&self.config));

        info!(
            records = trailer.counts.values().sum::<usize>(),
            grand_total = trailer.grand_total,
            trailer_lines = trailer.line_count(),
            "sintegra file rendered"
        );
        Ok((text, trailer))
    }

    pub fn manifest(&self) -> Result<FileManifest> {
        let (text, trailer) = self.render_with_trailer()?;
        Ok(FileManifest::new(&text, &trailer))
    }

    /// Audit hash of the manifest of the rendered file.
    pub fn manifest_hash(&self) -> Result<String> {
        self.manifest()?.hash().map_err(SintegraError::from)
    }
}
