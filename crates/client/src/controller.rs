//! Runs user actions against the API and keeps [`Presentation`] in step with the server.
//!
//! Every mutating action shows a transient status, waits for the server, and on success
//! re-fetches the list and the aggregate. Failures end up on the status line; nothing is
//! retried.

use crate::client::MedicineClient;
use crate::error::ClientResult;
use crate::presentation::{ModalState, Presentation, StatusKind};

#[derive(Debug)]
pub struct Controller {
    client: MedicineClient,
    view: Presentation,
}

impl Controller {
    pub fn new(client: MedicineClient) -> Self {
        Self {
            client,
            view: Presentation::new(),
        }
    }

    pub fn view(&self) -> &Presentation {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut Presentation {
        &mut self.view
    }

    /// Re-fetches the list and the aggregate. Returns `false` if either request failed, in
    /// which case the cached state is kept and the error is on the status line.
    pub async fn refresh(&mut self) -> bool {
        let fetched = async {
            let records = self.client.list().await?;
            let aggregate = self.client.average_price().await?;
            ClientResult::Ok((records, aggregate))
        }
        .await;

        match fetched {
            Ok((records, aggregate)) => {
                self.view.replace(records, aggregate);
                true
            }
            Err(e) => {
                tracing::warn!("refresh failed: {}", e);
                self.view.set_status(StatusKind::Error, e.user_message());
                false
            }
        }
    }

    /// Submits the create form.
    pub async fn create(&mut self, name: &str, price: &str) -> bool {
        self.view.set_status(StatusKind::Info, "Creating medicine...");
        let result = self.client.create(name, price).await;
        self.finish(result).await
    }

    /// Submits the edit modal. Does nothing unless the edit modal is open.
    ///
    /// `price` and `new_name` are the raw field contents; `None` leaves that field unchanged.
    pub async fn submit_edit(&mut self, price: Option<&str>, new_name: Option<&str>) -> bool {
        let ModalState::Edit { target } = self.view.modal().clone() else {
            return false;
        };
        self.view.set_status(StatusKind::Info, "Updating medicine...");
        let result = self.client.update(&target, price, new_name).await;
        self.finish(result).await
    }

    /// Confirms the delete modal. Does nothing unless the delete confirmation is open.
    pub async fn confirm_delete(&mut self) -> bool {
        let ModalState::DeleteConfirm { target } = self.view.modal().clone() else {
            return false;
        };
        self.view.set_status(StatusKind::Info, "Deleting medicine...");
        let result = self.client.delete(&target).await;
        self.finish(result).await
    }

    async fn finish(&mut self, result: ClientResult<String>) -> bool {
        match result {
            Ok(message) => {
                self.view.close_modal();
                self.view.set_status(StatusKind::Success, message);
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::debug!("request failed: {}", e);
                self.view.set_status(StatusKind::Error, e.user_message());
                false
            }
        }
    }
}
