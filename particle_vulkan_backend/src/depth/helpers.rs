use crate::util::result::{Result, VulkanError};

use ash::vk;

/// Depth formats from highest to lowest precision.
pub const DEPTH_FORMAT_CANDIDATES: [vk::Format; 5] = [
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D32_SFLOAT,
    vk::Format::D24_UNORM_S8_UINT,
    vk::Format::D16_UNORM_S8_UINT,
    vk::Format::D16_UNORM,
];

pub fn has_stencil_component(format: vk::Format) -> bool {
    matches!(
        format,
        vk::Format::D32_SFLOAT_S8_UINT | vk::Format::D24_UNORM_S8_UINT | vk::Format::D16_UNORM_S8_UINT
    )
}

pub fn depth_aspect_mask(format: vk::Format) -> vk::ImageAspectFlags {
    if has_stencil_component(format) {
        vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
    } else {
        vk::ImageAspectFlags::DEPTH
    }
}

pub fn find_depth_format(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> Result<vk::Format> {
    find_supported_format(
        &DEPTH_FORMAT_CANDIDATES,
        vk::ImageTiling::OPTIMAL,
        vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        |format| unsafe { instance.get_physical_device_format_properties(physical_device, format) },
    )
}

fn find_supported_format<F>(
    candidates: &[vk::Format],
    tiling: vk::ImageTiling,
    features: vk::FormatFeatureFlags,
    format_properties: F,
) -> Result<vk::Format>
where
    F: Fn(vk::Format) -> vk::FormatProperties,
{
    for &candidate_format in candidates {
        let props = format_properties(candidate_format);

        if tiling == vk::ImageTiling::LINEAR && props.linear_tiling_features.contains(features) {
            return Ok(candidate_format);
        } else if tiling == vk::ImageTiling::OPTIMAL
            && props.optimal_tiling_features.contains(features)
        {
            return Ok(candidate_format);
        }
    }

    Err(VulkanError::DepthFailedToFindSupportedFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supports_only(supported: &'static [vk::Format]) -> impl Fn(vk::Format) -> vk::FormatProperties {
        move |format| {
            if supported.contains(&format) {
                vk::FormatProperties {
                    optimal_tiling_features: vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
                    ..Default::default()
                }
            } else {
                vk::FormatProperties::default()
            }
        }
    }

    fn find(supported: &'static [vk::Format]) -> Result<vk::Format> {
        find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            supports_only(supported),
        )
    }

    #[test]
    fn picks_highest_precision_supported_format() {
        assert_eq!(
            find(&[vk::Format::D16_UNORM, vk::Format::D32_SFLOAT]).unwrap(),
            vk::Format::D32_SFLOAT
        );
        assert_eq!(
            find(&[vk::Format::D16_UNORM]).unwrap(),
            vk::Format::D16_UNORM
        );
    }

    #[test]
    fn fails_without_supported_format() {
        assert!(matches!(
            find(&[]),
            Err(VulkanError::DepthFailedToFindSupportedFormat)
        ));
    }

    #[test]
    fn stencil_aspect_only_for_stencil_formats() {
        assert_eq!(
            depth_aspect_mask(vk::Format::D32_SFLOAT),
            vk::ImageAspectFlags::DEPTH
        );
        assert_eq!(
            depth_aspect_mask(vk::Format::D24_UNORM_S8_UINT),
            vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
        );
    }
}
