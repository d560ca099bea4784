use serde::{Deserialize, Serialize};

use crate::data::grouping::RankedVideo;
use crate::error::SendError;
use crate::export::order_summary;

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// EmailJS credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl EmailConfig {
    /// All three values are set and none is a `YOUR_...` placeholder.
    pub fn is_configured(&self) -> bool {
        [&self.service_id, &self.template_id, &self.public_key]
            .iter()
            .all(|v| !v.trim().is_empty() && !v.starts_with("YOUR_"))
    }
}

// ---------------------------------------------------------------------------
// Form and payload
// ---------------------------------------------------------------------------

/// Fields the participant fills in before sending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailForm {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
}

impl EmailForm {
    pub fn validate(&self) -> Result<(), SendError> {
        if self.from_name.trim().is_empty() {
            return Err(SendError::MissingField("name"));
        }
        if self.from_email.trim().is_empty() {
            return Err(SendError::MissingField("email"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub complexity_order_list: String,
}

/// Body of the EmailJS `email/send` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailPayload {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

impl EmailPayload {
    pub fn build(
        config: &EmailConfig,
        form: &EmailForm,
        items: &[RankedVideo],
    ) -> Result<Self, SendError> {
        if !config.is_configured() {
            return Err(SendError::NotConfigured);
        }
        form.validate()?;
        Ok(Self {
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            user_id: config.public_key.clone(),
            template_params: TemplateParams {
                from_name: form.from_name.trim().to_string(),
                from_email: form.from_email.trim().to_string(),
                message: form.message.clone(),
                complexity_order_list: order_summary(items),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Something that can deliver an [`EmailPayload`].
pub trait EmailTransport {
    fn send(&self, payload: &EmailPayload) -> Result<(), SendError>;
}

/// EmailJS REST client.
pub struct EmailJsClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl EmailJsClient {
    pub fn new() -> Result<Self, SendError> {
        Self::with_endpoint(EMAILJS_SEND_URL)
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self, SendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl EmailTransport for EmailJsClient {
    fn send(&self, payload: &EmailPayload) -> Result<(), SendError> {
        let response = self.client.post(&self.endpoint).json(payload).send()?;
        let status = response.status();
        if status.is_success() {
            log::info!("Order emailed for {}", payload.template_params.from_email);
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(SendError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Validate, build and hand the order to `transport`.
pub fn send_order(
    transport: &dyn EmailTransport,
    config: &EmailConfig,
    form: &EmailForm,
    items: &[RankedVideo],
) -> Result<(), SendError> {
    let payload = EmailPayload::build(config, form, items)?;
    transport.send(&payload)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::grouping::GroupKey;
    use crate::data::model::VideoRecord;

    struct Recorder {
        sent: RefCell<Vec<EmailPayload>>,
        reject: bool,
    }

    impl EmailTransport for Recorder {
        fn send(&self, payload: &EmailPayload) -> Result<(), SendError> {
            self.sent.borrow_mut().push(payload.clone());
            if self.reject {
                Err(SendError::Rejected {
                    status: 400,
                    body: "The template ID is invalid".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn config() -> EmailConfig {
        EmailConfig {
            service_id: "service_abc".into(),
            template_id: "template_def".into(),
            public_key: "pk_123".into(),
        }
    }

    fn form() -> EmailForm {
        EmailForm {
            from_name: "Ada".into(),
            from_email: " ada@example.org ".into(),
            message: "notes".into(),
        }
    }

    fn items() -> Vec<RankedVideo> {
        vec![RankedVideo {
            record: VideoRecord::new("v/t_vis=1", "VID5"),
            complexity_rank: 2,
            group_key: GroupKey(Vec::new()),
        }]
    }

    #[test]
    fn placeholder_keys_count_as_unconfigured() {
        assert!(config().is_configured());
        assert!(!EmailConfig::default().is_configured());
        let mut cfg = config();
        cfg.template_id = "YOUR_TEMPLATE_ID".into();
        assert!(!cfg.is_configured());
    }

    #[test]
    fn payload_matches_emailjs_shape() {
        let payload = EmailPayload::build(&config(), &form(), &items()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["service_id"], "service_abc");
        assert_eq!(json["template_id"], "template_def");
        assert_eq!(json["user_id"], "pk_123");
        assert_eq!(json["template_params"]["from_email"], "ada@example.org");
        assert_eq!(
            json["template_params"]["complexity_order_list"],
            "User's Final Order:\n1. VID5 (Target Rank: 2)"
        );
    }

    #[test]
    fn unconfigured_service_never_reaches_transport() {
        let recorder = Recorder {
            sent: RefCell::new(Vec::new()),
            reject: false,
        };
        let err = send_order(&recorder, &EmailConfig::default(), &form(), &items()).unwrap_err();
        assert!(matches!(err, SendError::NotConfigured));
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn required_fields_are_checked() {
        let mut f = form();
        f.from_email = "  ".into();
        assert!(matches!(
            EmailPayload::build(&config(), &f, &items()),
            Err(SendError::MissingField("email"))
        ));
        f.from_name.clear();
        assert!(matches!(
            f.validate(),
            Err(SendError::MissingField("name"))
        ));
    }

    #[test]
    fn rejection_is_reported_and_retry_is_possible() {
        let failing = Recorder {
            sent: RefCell::new(Vec::new()),
            reject: true,
        };
        let err = send_order(&failing, &config(), &form(), &items()).unwrap_err();
        assert!(matches!(err, SendError::Rejected { status: 400, .. }));

        let working = Recorder {
            sent: RefCell::new(Vec::new()),
            reject: false,
        };
        send_order(&working, &config(), &form(), &items()).unwrap();
        assert_eq!(working.sent.borrow().len(), 1);
    }
}
