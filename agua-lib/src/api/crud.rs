//! Create, Read, Update, Delete operations
//!
//! Generic over any [`Resource`]; the collection path comes from
//! [`Resource::PATH`].
//!
//! # Example
//!
//! ```ignore
//! let cuentas = client.list::<Cuentahabiente>().await?;
//! let nuevo = client.create(&cuentahabiente).await?;
//! client.delete::<Cuentahabiente>(nuevo.id.unwrap()).await?;
//! ```

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::cancellable;
use crate::AguaClient;
use crate::error::Error;
use crate::model::Resource;

impl AguaClient {
    /// Lists every record of a collection.
    pub async fn list<T: Resource>(&self) -> Result<Vec<T>, Error> {
        self.get_list(T::PATH, &[]).await
    }

    /// Lists a collection with query-string filters, e.g. `[("activo", "1")]`.
    pub async fn list_where<T: Resource>(&self, query: &[(&str, String)]) -> Result<Vec<T>, Error> {
        self.get_list(T::PATH, query).await
    }

    /// Lists a collection, giving up with [`Error::Cancelled`] when `cancel` fires.
    pub async fn list_cancellable<T: Resource>(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, Error> {
        cancellable(cancel, self.list::<T>()).await
    }

    /// [`list_where`](Self::list_where) that gives up when `cancel` fires.
    pub async fn list_where_cancellable<T: Resource>(
        &self,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, Error> {
        cancellable(cancel, self.list_where::<T>(query)).await
    }

    /// Retrieves one record by id.
    pub async fn retrieve<T: Resource>(&self, id: i64) -> Result<T, Error> {
        self.send_item(Method::GET, &format!("{}/{}", T::PATH, id), None::<&()>)
            .await
    }

    /// Creates a record and returns it as stored by the backend.
    pub async fn create<T: Resource>(&self, record: &T) -> Result<T, Error> {
        if record.id().is_some() {
            return Err(Error::InvalidRequest(format!(
                "new {} must not carry an id",
                T::NAME
            )));
        }
        let created: T = self.send_item(Method::POST, T::PATH, Some(record)).await?;
        log::info!("Created {} {:?}", T::NAME, created.id());
        Ok(created)
    }

    /// Replaces a record and returns it as stored by the backend.
    pub async fn update<T: Resource>(&self, record: &T) -> Result<T, Error> {
        let id = record
            .id()
            .ok_or_else(|| Error::InvalidRequest(format!("{} without id cannot be updated", T::NAME)))?;
        let updated: T = self
            .send_item(Method::PUT, &format!("{}/{}", T::PATH, id), Some(record))
            .await?;
        log::info!("Updated {} {}", T::NAME, id);
        Ok(updated)
    }

    /// Deletes a record by id.
    pub async fn delete<T: Resource>(&self, id: i64) -> Result<(), Error> {
        self.request(
            Method::DELETE,
            &format!("{}/{}", T::PATH, id),
            &[],
            None::<&()>,
        )
        .await?;
        log::info!("Deleted {} {}", T::NAME, id);
        Ok(())
    }
}
