//! # 分块与编码核心（tiles）
//!
//! ## 设计思路
//!
//! 从叶子到根依次是：
//!
//! - `partition`：栅格 → 块向量（BlockPartitioner）
//! - `cluster`：聚类能力接口与 k-means 实现
//! - `palette`：块向量 → N 个代表字符（TilePaletteBuilder）
//! - `assign`：块 → 最近字符索引（TileAssigner）
//! - `hex`：字符位图 → 十六进制（RasterEncoder）
//! - `rle`：索引网格 → 行对齐 RLE 记录（RunLengthRowPacker）
//!
//! 全部为纯计算，不做 I/O。

pub mod assign;
pub mod cluster;
pub mod hex;
pub mod palette;
pub mod partition;
pub mod rle;

pub use assign::{IndexGrid, assign_tiles};
pub use cluster::{ClusterFit, Clusterer, KMeans};
pub use hex::encode_tile_hex;
pub use palette::{Palette, PaletteEntry, TilePaletteBuilder};
pub use partition::{BlockSet, partition_blocks};
pub use rle::{EncodedLine, Run, RunLengthRowPacker, align_runs_to_rows, pack_row_lines, run_length_encode};
