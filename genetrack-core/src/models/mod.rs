pub mod chromosome;
pub mod peak;
pub mod read;
pub mod strand;

// re-export for cleaner imports
pub use self::chromosome::{ChromosomeBlock, read_window};
pub use self::peak::Peak;
pub use self::read::Read;
pub use self::strand::Strand;
