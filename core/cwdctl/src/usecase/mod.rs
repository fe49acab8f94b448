pub(crate) mod cd;
pub(crate) mod report;

pub(crate) use cd::CdUseCase;
pub(crate) use report::{backend_lines, mirror_lines};
