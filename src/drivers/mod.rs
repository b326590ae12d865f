//! Driver implementations for the lens side of the link. They offer
//! a safe API over whatever hardware implements the HAL interfaces.

pub mod nikon {
    pub mod f_mount_lens;
}
