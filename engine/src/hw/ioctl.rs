use crate::params::HwParams;
use nix::libc;
use std::mem::size_of;

#[repr(C)]
#[derive(Debug)]
pub struct PcmInfo {
    pub device: libc::c_uint,
    pub subdevice: libc::c_uint,
    pub stream: libc::c_int,
    pub card: libc::c_int,
    pub id: [libc::c_uchar; 64],
    pub name: [libc::c_uchar; 80],
    pub subname: [libc::c_uchar; 32],
    pub dev_class: libc::c_int,
    pub dev_subclass: libc::c_int,
    pub subdevices_count: libc::c_uint,
    pub subdevices_avail: libc::c_uint,
    pub sync: [libc::c_uchar; 16],
    pub reserved: [libc::c_uchar; 64],
}

impl PcmInfo {
    pub fn new() -> Self {
        Self {
            device: 0,
            subdevice: 0,
            stream: 0,
            card: 0,
            id: [0; 64],
            name: [0; 80],
            subname: [0; 32],
            dev_class: 0,
            dev_subclass: 0,
            subdevices_count: 0,
            subdevices_avail: 0,
            sync: [0; 16],
            reserved: [0; 64],
        }
    }
}

#[repr(C)]
#[derive(Debug)]
pub struct XferI {
    pub result: libc::c_long,
    pub buf: *mut libc::c_void,
    pub frames: libc::c_ulong,
}

#[repr(C)]
#[derive(Debug)]
pub struct XferN {
    pub result: libc::c_long,
    pub bufs: *mut *mut libc::c_void,
    pub frames: libc::c_ulong,
}

const SNDRV_PCM_IOCTL_MAGIC: u8 = b'A';
const SNDRV_PCM_IOCTL_PVERSION: u8 = 0x00;
const SNDRV_PCM_IOCTL_INFO: u8 = 0x01;
const SNDRV_PCM_IOCTL_HW_REFINE: u8 = 0x10;
const SNDRV_PCM_IOCTL_HW_PARAMS: u8 = 0x11;
const SNDRV_PCM_IOCTL_HW_FREE: u8 = 0x12;
const SNDRV_PCM_IOCTL_PREPARE: u8 = 0x40;
const SNDRV_PCM_IOCTL_START: u8 = 0x42;
const SNDRV_PCM_IOCTL_DROP: u8 = 0x43;
const SNDRV_PCM_IOCTL_WRITEI_FRAMES: u8 = 0x50;
const SNDRV_PCM_IOCTL_READI_FRAMES: u8 = 0x51;
const SNDRV_PCM_IOCTL_WRITEN_FRAMES: u8 = 0x52;
const SNDRV_PCM_IOCTL_READN_FRAMES: u8 = 0x53;

nix::ioctl_read!(
    pcm_pversion,
    SNDRV_PCM_IOCTL_MAGIC,
    SNDRV_PCM_IOCTL_PVERSION,
    libc::c_int
);
nix::ioctl_read!(pcm_info, SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_INFO, PcmInfo);
nix::ioctl_readwrite!(
    pcm_hw_refine,
    SNDRV_PCM_IOCTL_MAGIC,
    SNDRV_PCM_IOCTL_HW_REFINE,
    HwParams
);
nix::ioctl_readwrite!(
    pcm_hw_params,
    SNDRV_PCM_IOCTL_MAGIC,
    SNDRV_PCM_IOCTL_HW_PARAMS,
    HwParams
);
nix::ioctl_none!(pcm_hw_free, SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_HW_FREE);
nix::ioctl_none!(pcm_prepare, SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_PREPARE);
nix::ioctl_none!(pcm_start, SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_START);
nix::ioctl_none!(pcm_drop, SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_DROP);

// The kernel writes the transferred frame count back into the structure even
// for the write direction, so every transfer takes a mutable pointer.
nix::ioctl_readwrite_bad!(
    pcm_writei_frames,
    nix::request_code_write!(
        SNDRV_PCM_IOCTL_MAGIC,
        SNDRV_PCM_IOCTL_WRITEI_FRAMES,
        size_of::<XferI>()
    ),
    XferI
);
nix::ioctl_readwrite_bad!(
    pcm_readi_frames,
    nix::request_code_read!(
        SNDRV_PCM_IOCTL_MAGIC,
        SNDRV_PCM_IOCTL_READI_FRAMES,
        size_of::<XferI>()
    ),
    XferI
);
nix::ioctl_readwrite_bad!(
    pcm_writen_frames,
    nix::request_code_write!(
        SNDRV_PCM_IOCTL_MAGIC,
        SNDRV_PCM_IOCTL_WRITEN_FRAMES,
        size_of::<XferN>()
    ),
    XferN
);
nix::ioctl_readwrite_bad!(
    pcm_readn_frames,
    nix::request_code_read!(
        SNDRV_PCM_IOCTL_MAGIC,
        SNDRV_PCM_IOCTL_READN_FRAMES,
        size_of::<XferN>()
    ),
    XferN
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_layout_matches_kernel() {
        assert_eq!(size_of::<PcmInfo>(), 288);
    }

    #[test]
    fn request_codes_match_uapi() {
        let refine = nix::request_code_readwrite!(
            SNDRV_PCM_IOCTL_MAGIC,
            SNDRV_PCM_IOCTL_HW_REFINE,
            size_of::<HwParams>()
        );
        #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
        assert_eq!(refine as u32, 0xc260_4110);

        let prepare = nix::request_code_none!(SNDRV_PCM_IOCTL_MAGIC, SNDRV_PCM_IOCTL_PREPARE);
        assert_eq!(prepare as u32, 0x0000_4140);
    }
}
