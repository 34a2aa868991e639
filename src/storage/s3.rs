use anyhow::Result;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, Config};

/// Thin wrapper around the S3 client that keys URL construction off an
/// optional CDN front. Uploaded invoices are addressed by the returned URL,
/// never re-derived from bucket and key elsewhere.
pub struct S3Client {
    client: Client,
    cdn_url: Option<String>,
}

impl S3Client {
    pub async fn new() -> Result<Self> {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");

        let config = aws_config::from_env().region(region_provider).load().await;

        let client = Client::new(&config);

        let cdn_url = std::env::var("CDN_URL").ok();

        Ok(S3Client { client, cdn_url })
    }

    pub async fn new_for_r2(
        account_id: String,
        access_key_id: String,
        secret_access_key: String,
    ) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "r2",
        );

        let config = Config::builder()
            .region(Region::new("auto"))
            .endpoint_url(format!("https://{}.r2.cloudflarestorage.com", account_id))
            .credentials_provider(credentials)
            .build();

        let client = Client::from_conf(config);

        Ok(S3Client {
            client,
            cdn_url: None,
        })
    }

    /// Upload and return the public URL the record should carry.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let body = ByteStream::from(data);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await?;

        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        if let Some(cdn) = &self.cdn_url {
            format!("{}/{}", cdn, key)
        } else {
            format!("https://{}.s3.amazonaws.com/{}", bucket, key)
        }
    }
}
