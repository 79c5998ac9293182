pub mod bits;
pub mod cache;
pub mod demux;
pub mod dependent;
pub mod lists;
pub mod permutation;
pub mod product;
pub mod subsets;
pub mod util;
