pub mod aggregate;
pub mod filesystem;
pub mod pipeline;
pub mod qualifier;
pub mod records;
pub mod signals;
