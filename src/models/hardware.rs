use serde::Serialize;

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Hardware fields extracted from a user record. `None` means the field was
/// not reported at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedHardware {
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub memory: Option<String>,
    pub drive: Option<String>,
}

impl ParsedHardware {
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none() && self.gpu.is_none() && self.memory.is_none() && self.drive.is_none()
    }
}

/// Outcome of reading a `hardware` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HardwareRecord {
    Parsed(ParsedHardware),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Other,
}

impl GpuVendor {
    pub fn detect(gpu: &str) -> GpuVendor {
        let lower = gpu.to_lowercase();
        if lower.contains("nvidia") || lower.contains("geforce") || lower.contains("rtx") {
            GpuVendor::Nvidia
        } else if lower.contains("amd") || lower.contains("radeon") {
            GpuVendor::Amd
        } else {
            GpuVendor::Other
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            GpuVendor::Nvidia => "gpu-nvidia",
            GpuVendor::Amd => "gpu-amd",
            GpuVendor::Other => "gpu-other",
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl HardwareRecord {
    pub fn fields(&self) -> Option<&ParsedHardware> {
        match self {
            HardwareRecord::Parsed(hw) => Some(hw),
            HardwareRecord::Unknown => None,
        }
    }

    pub fn cpu(&self) -> Option<&str> {
        self.fields().and_then(|hw| present(&hw.cpu))
    }

    pub fn gpu(&self) -> Option<&str> {
        self.fields().and_then(|hw| present(&hw.gpu))
    }

    pub fn memory(&self) -> Option<&str> {
        self.fields().and_then(|hw| present(&hw.memory))
    }

    pub fn drive(&self) -> Option<&str> {
        self.fields().and_then(|hw| present(&hw.drive))
    }

    /// Chart label for the CPU: trimmed model name or `Unknown`.
    pub fn cpu_label(&self) -> String {
        self.cpu().map(|s| s.trim().to_string()).unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    pub fn gpu_label(&self) -> String {
        self.gpu().map(|s| s.trim().to_string()).unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_read_as_absent() {
        let hw = HardwareRecord::Parsed(ParsedHardware {
            cpu: Some(String::new()),
            gpu: Some("  RTX 3060 ".into()),
            ..Default::default()
        });
        assert_eq!(hw.cpu(), None);
        assert_eq!(hw.cpu_label(), "Unknown");
        assert_eq!(hw.gpu_label(), "RTX 3060");
        assert_eq!(HardwareRecord::Unknown.gpu_label(), "Unknown");
    }

    #[test]
    fn vendor_detection() {
        assert_eq!(GpuVendor::detect("NVIDIA GeForce RTX 4090"), GpuVendor::Nvidia);
        assert_eq!(GpuVendor::detect("AMD Radeon RX 7900"), GpuVendor::Amd);
        assert_eq!(GpuVendor::detect("Intel UHD 770"), GpuVendor::Other);
    }
}
