use crate::util::result::Result;

use ash::vk;
use std::ffi::CStr;
use std::os::raw::c_char;

/// Converts a fixed size, nul terminated vulkan string (like a device or layer name) to an owned string.
pub fn vk_to_string(raw_string_array: &[c_char]) -> Result<String> {
    let bytes: Vec<u8> = raw_string_array
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    let raw_string = std::str::from_utf8(&bytes)?;
    Ok(raw_string.to_owned())
}

pub fn vk_to_cstr(raw_string_array: &[c_char]) -> Option<&CStr> {
    // vulkan strings are fixed arrays, so a missing nul means a malformed string
    let bytes = unsafe {
        std::slice::from_raw_parts(raw_string_array.as_ptr() as *const u8, raw_string_array.len())
    };
    CStr::from_bytes_until_nul(bytes).ok()
}

pub fn physical_device_type_string(device_type: vk::PhysicalDeviceType) -> &'static str {
    match device_type {
        vk::PhysicalDeviceType::OTHER => "OTHER",
        vk::PhysicalDeviceType::INTEGRATED_GPU => "INTEGRATED_GPU",
        vk::PhysicalDeviceType::DISCRETE_GPU => "DISCRETE_GPU",
        vk::PhysicalDeviceType::VIRTUAL_GPU => "VIRTUAL_GPU",
        vk::PhysicalDeviceType::CPU => "CPU",
        _ => "UNKNOWN_DEVICE_TYPE",
    }
}

pub fn api_version_string(api_version: u32) -> String {
    format!(
        "{}.{}.{}",
        vk::api_version_major(api_version),
        vk::api_version_minor(api_version),
        vk::api_version_patch(api_version)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_vk_array(name: &str) -> [c_char; 16] {
        let mut array = [0 as c_char; 16];
        for (i, b) in name.bytes().enumerate() {
            array[i] = b as c_char;
        }
        array
    }

    #[test]
    fn converts_nul_terminated_arrays() {
        let array = to_vk_array("llvmpipe");
        assert_eq!(vk_to_string(&array).unwrap(), "llvmpipe");
        assert_eq!(vk_to_cstr(&array).unwrap().to_bytes(), b"llvmpipe");
    }

    #[test]
    fn formats_api_version() {
        assert_eq!(api_version_string(vk::make_api_version(0, 1, 3, 250)), "1.3.250");
        assert_eq!(
            physical_device_type_string(vk::PhysicalDeviceType::DISCRETE_GPU),
            "DISCRETE_GPU"
        );
    }
}
