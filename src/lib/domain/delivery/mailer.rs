//! Mailer module

use anyhow::anyhow;
use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::message::EmailMessage;

use super::{AdapterError, Receipt, SmtpAdapter, Transport};

/// Async entry point for delivering emails
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Deliver an email
    ///
    /// # Arguments
    /// * `email` - The [`EmailMessage`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] holding the transport's [`Receipt`] on success.
    async fn deliver(&self, email: EmailMessage) -> Result<Receipt, AdapterError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn deliver(&self, email: EmailMessage) -> Result<Receipt, AdapterError>;
    }
}

#[async_trait]
impl<T> Mailer for SmtpAdapter<T>
where
    T: Transport,
{
    /// Runs the blocking delivery on tokio's blocking pool
    async fn deliver(&self, email: EmailMessage) -> Result<Receipt, AdapterError> {
        let adapter = self.clone();

        tokio::task::spawn_blocking(move || SmtpAdapter::deliver(&adapter, &email))
            .await
            .map_err(|err| anyhow!("delivery task did not complete: {}", err))?
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        config::RawConfig,
        delivery::{tests::MockTransport, DeliveryError, TransportError},
    };

    use super::*;

    fn adapter(transport: MockTransport) -> TestResult<SmtpAdapter<MockTransport>> {
        Ok(SmtpAdapter::new(
            RawConfig::new()
                .with("server", "smtp.example.com")
                .with("port", 25),
            transport,
        )?)
    }

    #[tokio::test]
    async fn test_async_delivery_success() -> TestResult {
        let mut transport = MockTransport::new();
        transport.expect_name().return_const("mock");
        transport
            .expect_send()
            .times(1)
            .returning(|_, _, _, _| Ok(Receipt::new("250 queued")));

        let receipt = Mailer::deliver(
            &adapter(transport)?,
            EmailMessage::new("a@example.com").to("b@example.com"),
        )
        .await?;

        assert_eq!(receipt.response, "250 queued");

        Ok(())
    }

    #[tokio::test]
    async fn test_async_delivery_failure() -> TestResult {
        let mut transport = MockTransport::new();
        transport.expect_name().return_const("mock");
        transport
            .expect_send()
            .times(1)
            .returning(|_, _, _, _| Err(TransportError::NoCredentials));

        let result = Mailer::deliver(
            &adapter(transport)?,
            EmailMessage::new("a@example.com").to("b@example.com"),
        )
        .await;

        assert!(matches!(
            result,
            Err(AdapterError::Delivery(DeliveryError::MissingCredentials))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_mock_mailer() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_deliver()
            .times(1)
            .withf(|email| email.subject.as_deref() == Some("Hi"))
            .returning(|_| Ok(Receipt::new("ok")));

        let receipt = mailer
            .deliver(EmailMessage::new("a@example.com").subject("Hi"))
            .await?;

        assert_eq!(receipt, Receipt::new("ok"));

        Ok(())
    }
}
