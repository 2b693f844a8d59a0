use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewportConfig {
    pub theme_color: &'static str,
    pub width: &'static str,
    pub initial_scale: f64,
    pub maximum_scale: f64,
    pub user_scalable: bool,
}

pub const VIEWPORT: ViewportConfig = ViewportConfig {
    theme_color: "#f97316",
    width: "device-width",
    initial_scale: 1.0,
    maximum_scale: 5.0,
    user_scalable: true,
};

impl ViewportConfig {
    /// Checked once at startup. A failure here is a programming error.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            anyhow::bail!(
                "viewport initial_scale must be > 0 (got {})",
                self.initial_scale
            );
        }
        if !self.maximum_scale.is_finite() || self.maximum_scale < self.initial_scale {
            anyhow::bail!(
                "viewport maximum_scale ({}) must be >= initial_scale ({})",
                self.maximum_scale,
                self.initial_scale
            );
        }
        if self.maximum_scale < 1.0 {
            anyhow::bail!(
                "viewport maximum_scale must be >= 1 (got {})",
                self.maximum_scale
            );
        }
        if self.width.trim().is_empty() {
            anyhow::bail!("viewport width directive is empty");
        }
        Ok(())
    }

    /// Content of `<meta name="viewport">`.
    pub fn meta_content(&self) -> String {
        format!(
            "width={}, initial-scale={}, maximum-scale={}, user-scalable={}",
            self.width,
            self.initial_scale,
            self.maximum_scale,
            if self.user_scalable { "yes" } else { "no" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewport_is_valid() {
        VIEWPORT.validate().unwrap();
        assert_eq!(
            VIEWPORT.meta_content(),
            "width=device-width, initial-scale=1, maximum-scale=5, user-scalable=yes"
        );
    }

    #[test]
    fn rejects_maximum_below_initial() {
        let cfg = ViewportConfig {
            initial_scale: 2.0,
            maximum_scale: 1.5,
            ..VIEWPORT
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("maximum_scale"), "{err}");
    }

    #[test]
    fn rejects_maximum_below_one() {
        let cfg = ViewportConfig {
            initial_scale: 0.5,
            maximum_scale: 0.75,
            ..VIEWPORT
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains(">= 1"), "{err}");
    }

    #[test]
    fn rejects_non_positive_initial_scale() {
        let cfg = ViewportConfig {
            initial_scale: 0.0,
            ..VIEWPORT
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn fractional_scales_render_verbatim() {
        let cfg = ViewportConfig {
            initial_scale: 1.5,
            maximum_scale: 2.5,
            user_scalable: false,
            ..VIEWPORT
        };
        cfg.validate().unwrap();
        assert_eq!(
            cfg.meta_content(),
            "width=device-width, initial-scale=1.5, maximum-scale=2.5, user-scalable=no"
        );
    }
}
