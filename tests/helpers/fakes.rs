// In-memory implementations of every repository and platform trait

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use salon_admin::core::{AppError, Result};
use salon_admin::modules::catalog::models::{NewProduct, Product, ProductPatch, SalonService};
use salon_admin::modules::catalog::repositories::{ProductRepository, ServiceRepository};
use salon_admin::modules::health::DatabaseProbe;
use salon_admin::modules::loans::models::{LoanEntry, LoanOperation, LoanQuery};
use salon_admin::modules::loans::repositories::LoanRepository;
use salon_admin::modules::media::models::{MediaItem, MediaPatch, NewMediaItem};
use salon_admin::modules::media::repositories::MediaRepository;
use salon_admin::modules::media::services::ObjectStorage;
use salon_admin::modules::sales::models::{
    CreatedSale, ProductSale, SaleDraft, SaleItem, SaleRecord,
};
use salon_admin::modules::sales::repositories::{
    ProductSaleRepository, SaleRepository, SummaryProcedureArgs,
};
use salon_admin::modules::users::models::{NewUser, User, UserProfile};
use salon_admin::modules::users::repositories::UserRepository;
use salon_admin::modules::users::services::IdentityProvider;

fn next_id(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

fn injected(what: &str) -> AppError {
    AppError::internal(format!("injected {} failure", what))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryUserRepository {
    pub users: Mutex<Vec<User>>,
    pub fail_insert: AtomicBool,
    pub fail_list_all: AtomicBool,
}

impl MemoryUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self, page: i64, limit: i64) -> Result<Vec<User>> {
        let limit = limit.clamp(1, 100) as usize;
        let skip = (page.max(1) as usize - 1) * limit;
        Ok(self.snapshot().into_iter().skip(skip).take(limit).collect())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        if self.fail_list_all.load(Ordering::SeqCst) {
            return Err(injected("user list"));
        }
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.snapshot().into_iter().find(|u| u.id == id))
    }

    async fn insert(&self, user: &NewUser) -> Result<User> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(injected("profile insert"));
        }
        let now = Utc::now();
        let p = &user.profile;
        let created = User {
            id: user.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            phone: p.phone.clone(),
            email: p.email.clone(),
            role: p.role,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.first_name = profile.first_name.clone();
            u.last_name = profile.last_name.clone();
            u.phone = profile.phone.clone();
            u.email = profile.email.clone();
            u.role = profile.role;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

#[derive(Default)]
pub struct FakeIdentityProvider {
    pub created: Mutex<Vec<(Uuid, String)>>,
    pub deleted: Mutex<Vec<Uuid>>,
    pub email_updates: Mutex<Vec<(Uuid, String)>>,
    pub fail_create: AtomicBool,
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_identity(&self, email: &str, _password: &str) -> Result<Uuid> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::upstream("A user with this email address has already been registered"));
        }
        let id = Uuid::new_v4();
        self.created.lock().unwrap().push((id, email.to_string()));
        Ok(id)
    }

    async fn update_email(&self, id: Uuid, email: &str) -> Result<()> {
        self.email_updates
            .lock()
            .unwrap()
            .push((id, email.to_string()));
        Ok(())
    }

    async fn delete_identity(&self, id: Uuid) -> Result<()> {
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryProductRepository {
    pub products: Mutex<Vec<Product>>,
    pub fail_lookup: AtomicBool,
    ids: AtomicI64,
}

impl MemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        let max = products.iter().map(|p| p.id).max().unwrap_or(0);
        Self {
            products: Mutex::new(products),
            ids: AtomicI64::new(max),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(injected("product lookup"));
        }
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product> {
        let created = Product {
            id: next_id(&self.ids),
            name: product.name.trim().to_string(),
            quantity: product.quantity,
            unit_price: product.unit_price,
            discount_percent: product.discount_percent,
            created_at: Utc::now(),
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        Ok(products.iter_mut().find(|p| p.id == id).map(|p| {
            if let Some(name) = &patch.name {
                p.name = name.trim().to_string();
            }
            if let Some(quantity) = patch.quantity {
                p.quantity = quantity;
            }
            if let Some(price) = patch.unit_price {
                p.unit_price = price;
            }
            if patch.discount_percent.is_some() {
                p.discount_percent = patch.discount_percent;
            }
            p.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryServiceRepository {
    pub services: Mutex<Vec<SalonService>>,
    ids: AtomicI64,
}

#[async_trait]
impl ServiceRepository for MemoryServiceRepository {
    async fn list(&self) -> Result<Vec<SalonService>> {
        let mut services = self.services.lock().unwrap().clone();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn insert(&self, name: &str) -> Result<SalonService> {
        let service = SalonService {
            id: next_id(&self.ids),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.services.lock().unwrap().push(service.clone());
        Ok(service)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool> {
        let mut services = self.services.lock().unwrap();
        let before = services.len();
        services.retain(|s| s.name != name);
        Ok(services.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySaleRepository {
    pub records: Mutex<Vec<SaleRecord>>,
    pub items: Mutex<Vec<SaleItem>>,
    pub procedure_calls: Mutex<Vec<SummaryProcedureArgs>>,
    pub fail_items: AtomicBool,
    pub fail_records: AtomicBool,
    ids: AtomicI64,
}

impl MemorySaleRepository {
    pub fn with_records(records: Vec<SaleRecord>, items: Vec<SaleItem>) -> Self {
        let max = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            records: Mutex::new(records),
            items: Mutex::new(items),
            ids: AtomicI64::new(max),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SaleRepository for MemorySaleRepository {
    async fn list_records(&self, employee_id: Option<Uuid>) -> Result<Vec<SaleRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| employee_id.map_or(true, |id| r.employee_id == id))
            .cloned()
            .collect())
    }

    async fn list_records_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(injected("sale records"));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.sale_date >= start && r.sale_date <= end)
            .cloned()
            .collect())
    }

    async fn list_items(&self, sale_ids: &[i64]) -> Result<Vec<SaleItem>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| sale_ids.contains(&i.sale_id))
            .cloned()
            .collect())
    }

    /// Mirrors the transaction: nothing is kept when the items fail
    async fn create_sale(&self, draft: &SaleDraft) -> Result<CreatedSale> {
        if self.fail_items.load(Ordering::SeqCst) {
            return Err(injected("sale item insert"));
        }

        let sale = SaleRecord {
            id: next_id(&self.ids),
            sale_code: draft.sale_code.clone(),
            payment_method: draft.payment_method,
            total_amount: draft.total_amount,
            earnings_amount: draft.earnings_amount,
            employee_id: draft.employee_id,
            sale_date: draft.sale_date,
        };

        let mut items = self.items.lock().unwrap();
        let mut created_items = Vec::new();
        for item in &draft.items {
            let created = SaleItem {
                id: items.len() as i64 + 1,
                sale_id: sale.id,
                service_name: item.service_name.clone(),
                unit_cost: item.unit_cost,
                quantity: item.quantity,
                employee_earnings: item.employee_earnings,
            };
            items.push(created.clone());
            created_items.push(created);
        }
        self.records.lock().unwrap().push(sale.clone());

        Ok(CreatedSale {
            sale,
            items: created_items,
        })
    }

    async fn summary_procedure(&self, args: &SummaryProcedureArgs) -> Result<serde_json::Value> {
        self.procedure_calls.lock().unwrap().push(args.clone());
        Ok(serde_json::json!([]))
    }
}

#[derive(Default)]
pub struct MemoryProductSaleRepository {
    pub rows: Mutex<Vec<ProductSale>>,
    pub fail_list: AtomicBool,
    ids: AtomicI64,
}

impl MemoryProductSaleRepository {
    pub fn with_rows(rows: Vec<ProductSale>) -> Self {
        let max = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            rows: Mutex::new(rows),
            ids: AtomicI64::new(max),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ProductSaleRepository for MemoryProductSaleRepository {
    async fn record(&self, product_id: i64, quantity: i32) -> Result<ProductSale> {
        let row = ProductSale {
            id: next_id(&self.ids),
            product_id,
            quantity,
            total: Decimal::ZERO,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProductSale>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("product sales"));
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.created_at >= start && r.created_at <= end)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryLoanRepository {
    pub entries: Mutex<Vec<LoanEntry>>,
    pub fail_insert: AtomicBool,
    pub fail_list: AtomicBool,
    ids: AtomicI64,
}

impl MemoryLoanRepository {
    pub fn with_entries(entries: Vec<LoanEntry>) -> Self {
        let max = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            entries: Mutex::new(entries),
            ids: AtomicI64::new(max),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<LoanEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoanRepository for MemoryLoanRepository {
    async fn list(&self, query: &LoanQuery) -> Result<Vec<LoanEntry>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("loan ledger"));
        }
        let mut entries: Vec<LoanEntry> = self
            .snapshot()
            .into_iter()
            .filter(|e| query.employee_id.map_or(true, |id| e.employee_id == id))
            .filter(|e| {
                query
                    .range
                    .map_or(true, |(start, end)| e.created_at >= start && e.created_at < end)
            })
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn insert(
        &self,
        employee_id: Uuid,
        operation: LoanOperation,
        amount: Decimal,
    ) -> Result<LoanEntry> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(injected("ledger insert"));
        }
        let entry = LoanEntry {
            id: next_id(&self.ids),
            employee_id,
            operation,
            amount,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryMediaRepository {
    pub items: Mutex<Vec<MediaItem>>,
    pub fail_insert: AtomicBool,
    pub patch_batches: Mutex<usize>,
}

impl MemoryMediaRepository {
    pub fn with_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaRepository for MemoryMediaRepository {
    async fn list(&self) -> Result<Vec<MediaItem>> {
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaItem>> {
        Ok(self.snapshot().into_iter().find(|m| m.id == id))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<MediaItem>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|m| ids.contains(&m.id))
            .collect())
    }

    async fn insert(&self, item: &NewMediaItem) -> Result<MediaItem> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(injected("media insert"));
        }
        let created = MediaItem {
            id: Uuid::new_v4(),
            name: item.name.clone(),
            url: item.url.clone(),
            mime_type: item.mime_type.clone(),
            section: None,
            sort_order: 0,
            position: "center".to_string(),
            storage_path: Some(item.storage_path.clone()),
            owner: item.owner,
            created_at: Utc::now(),
        };
        self.items.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|m| m.id != id);
        Ok(items.len() < before)
    }

    async fn apply_patches(&self, patches: &[(Uuid, MediaPatch)]) -> Result<Vec<MediaItem>> {
        *self.patch_batches.lock().unwrap() += 1;
        let mut items = self.items.lock().unwrap();
        let mut updated = Vec::new();
        for (id, patch) in patches {
            let item = items
                .iter_mut()
                .find(|m| m.id == *id)
                .ok_or_else(|| AppError::not_found(format!("Media item {}", id)))?;
            item.section = patch.section.map(|s| s.as_str().to_string());
            item.sort_order = patch.order;
            item.position = patch.position.trim().to_string();
            updated.push(item.clone());
        }
        Ok(updated)
    }
}

#[derive(Default)]
pub struct FakeStorage {
    pub objects: Mutex<HashMap<String, Bytes>>,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, path: &str, _content_type: &str, body: Bytes) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(path) {
            return Err(AppError::upstream("The resource already exists"));
        }
        objects.insert(path.to_string(), body);
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(path);
            self.removed.lock().unwrap().push(path.clone());
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/media/{}", path)
    }
}

pub struct AlwaysUpProbe;

#[async_trait]
impl DatabaseProbe for AlwaysUpProbe {
    async fn ping(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}
