use crate::config::{AffiliateSlot, PipelineConfig};
use crate::types::{DraftArticle, Result};
use crate::utils::markdown_links_to_html;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Metadata gathered from a published artifact, used to regenerate the
/// derived index/sitemap/feed files.
#[derive(Debug, Clone)]
pub struct PostMetadata {
    pub title: String,
    pub slug: String,
    pub path: String,
    pub date: DateTime<Utc>,
}

/// Outcome of one publishing pass. Topics listed in `published_topic_ids`
/// had both their artifact written and may advance to `published`; topics
/// that failed are reported in `errors` and left untouched.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub published_paths: Vec<PathBuf>,
    pub published_topic_ids: Vec<String>,
    pub errors: Vec<String>,
}

/// Publishing stage: writes one HTML artifact per approved draft (keyed by
/// slug, last-write-wins) and regenerates the site index, sitemap, and RSS
/// feed from a full re-scan of the published set.
pub struct DistributionAgent {
    root_dir: PathBuf,
    articles_dir: PathBuf,
    data_dir: PathBuf,
    base_url: String,
    adsense_id: Option<String>,
    affiliate_slots: Vec<AffiliateSlot>,
}

impl DistributionAgent {
    pub fn new(root_dir: &Path, config: &PipelineConfig) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            articles_dir: root_dir.join("articles"),
            data_dir: root_dir.join("data"),
            base_url: config.base_url.clone(),
            adsense_id: config.adsense_id.clone(),
            affiliate_slots: config.affiliate_slots.clone(),
        }
    }

    /// Fill the fixed `{{AFFILIATE_TOOL_N}}` placeholder slots with the
    /// configured name/URL pairs. Text without placeholders passes through
    /// unchanged.
    fn substitute_affiliates(&self, content: &str) -> String {
        let mut content = content.to_string();
        for (i, slot) in self.affiliate_slots.iter().enumerate() {
            let placeholder = format!("{{{{AFFILIATE_TOOL_{}}}}}", i + 1);
            let link = format!("[{}]({})", slot.name, slot.url);
            content = content.replace(&placeholder, &link);
        }
        content
    }

    fn render_html(&self, draft: &DraftArticle) -> String {
        let body = markdown_links_to_html(&self.substitute_affiliates(&draft.content));
        let canonical = format!("{}/articles/{}.html", self.base_url, draft.slug);

        let adsense_tag = match &self.adsense_id {
            Some(id) => format!(
                "  <script async src=\"https://pagead2.googlesyndication.com/pagead/js/adsbygoogle.js?client={}\" crossorigin=\"anonymous\"></script>\n",
                id
            ),
            None => String::new(),
        };

        format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             \x20 <meta charset=\"utf-8\" />\n\
             \x20 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n\
             \x20 <title>{title}</title>\n\
             \x20 <meta name=\"description\" content=\"In-depth technical guide: {title}. Practical trade-offs, implementation patterns, and recommendations for production engineers.\" />\n\
             \x20 <link rel=\"canonical\" href=\"{canonical}\" />\n\
             \x20 <meta name=\"robots\" content=\"index, follow\" />\n\
             \x20 <link rel=\"stylesheet\" href=\"../assets/style.css\" />\n\
             {adsense_tag}\
             </head>\n\
             <body>\n\
             <article>\n{body}\n</article>\n\
             </body>\n\
             </html>\n",
            title = draft.title,
            canonical = canonical,
            adsense_tag = adsense_tag,
            body = body,
        )
    }

    fn publish_article(&self, draft: &DraftArticle) -> Result<PathBuf> {
        fs::create_dir_all(&self.articles_dir)?;
        let path = self.articles_dir.join(format!("{}.html", draft.slug));
        fs::write(&path, self.render_html(draft))?;
        Ok(path)
    }

    /// Short-form video script outline saved next to the data files, usable
    /// later for recording companion clips.
    fn write_video_script_stub(&self, draft: &DraftArticle) -> Result<()> {
        let dir = self.data_dir.join("video_scripts");
        fs::create_dir_all(&dir)?;
        let outline = format!(
            "# Short video script for: {}\n\
             \n\
             ## Hook (3–5 seconds)\n\
             - State the core pain point in a single sharp sentence.\n\
             \n\
             ## Context (5–10 seconds)\n\
             - Mention who this is for and when it matters.\n\
             \n\
             ## Key idea (10–20 seconds)\n\
             - Summarise one concrete insight from the article.\n\
             \n\
             ## Call to action (3–5 seconds)\n\
             - Invite viewers to read the full guide on the site.\n",
            draft.title
        );
        fs::write(dir.join(format!("{}-short-script.md", draft.slug)), outline)?;
        Ok(())
    }

    /// Re-scan every published artifact for title/slug/date. The derived
    /// files are rebuilt from this list rather than patched incrementally so
    /// they always agree with the artifact set.
    pub fn load_posts_metadata(&self) -> Result<Vec<PostMetadata>> {
        let mut posts = Vec::new();
        if !self.articles_dir.exists() {
            return Ok(posts);
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&self.articles_dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
            .collect();
        entries.sort();

        for path in entries {
            let text = fs::read_to_string(&path)?;
            let slug = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let title = extract_title(&text).unwrap_or_else(|| slug.clone());
            let date = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            posts.push(PostMetadata {
                title,
                path: format!("articles/{}.html", slug),
                slug,
                date,
            });
        }
        Ok(posts)
    }

    fn update_index(&self, posts: &[PostMetadata]) -> Result<()> {
        let mut sorted: Vec<&PostMetadata> = posts.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let items: Vec<String> = sorted
            .iter()
            .map(|post| {
                format!(
                    "    <li><a href=\"{}\">{}</a> <span style=\"font-size: 0.8em; color: #666;\">(updated {})</span></li>",
                    post.path,
                    post.title,
                    post.date.to_rfc3339()
                )
            })
            .collect();
        let items_html = if items.is_empty() {
            "    <li>No articles have been published yet. Check back tomorrow.</li>".to_string()
        } else {
            items.join("\n")
        };

        let html = format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             \x20 <meta charset=\"utf-8\" />\n\
             \x20 <title>Technical Knowledge Base</title>\n\
             \x20 <link rel=\"stylesheet\" href=\"assets/style.css\" />\n\
             </head>\n\
             <body>\n\
             \x20 <h1>Technical Knowledge Base</h1>\n\
             \x20 <p>In-depth technical guides and compatibility documentation.</p>\n\
             \x20 <h2>Articles</h2>\n\
             \x20 <ul>\n\
             {}\n\
             \x20 </ul>\n\
             </body>\n\
             </html>\n",
            items_html
        );
        fs::write(self.root_dir.join("index.html"), html)?;
        Ok(())
    }

    fn update_sitemap(&self, posts: &[PostMetadata]) -> Result<()> {
        let mut urls = vec![format!("{}/", self.base_url)];
        urls.extend(posts.iter().map(|p| format!("{}/{}", self.base_url, p.path)));

        let today = Utc::now().date_naive();
        let entries: Vec<String> = urls
            .iter()
            .map(|url| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>daily</changefreq>\n    <priority>0.7</priority>\n  </url>",
                    url, today
                )
            })
            .collect();

        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>\n",
            entries.join("\n")
        );
        fs::write(self.root_dir.join("sitemap.xml"), xml)?;
        Ok(())
    }

    fn update_rss(&self, posts: &[PostMetadata]) -> Result<()> {
        let mut sorted: Vec<&PostMetadata> = posts.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let items: Vec<String> = sorted
            .iter()
            .map(|post| {
                format!(
                    "  <item>\n    <title>{}</title>\n    <link>{base}/{path}</link>\n    <guid>{base}/{path}</guid>\n    <pubDate>{}</pubDate>\n    <description>Long-form technical guide generated by the autonomous pipeline.</description>\n  </item>",
                    post.title,
                    post.date.to_rfc2822(),
                    base = self.base_url,
                    path = post.path,
                )
            })
            .collect();

        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n <channel>\n  <title>Foundry Autonomous Tech Insights</title>\n  <link>{}/</link>\n  <description>Daily long-form content on developer tooling and compatibility.</description>\n{}\n </channel>\n</rss>\n",
            self.base_url,
            items.join("\n")
        );
        fs::write(self.root_dir.join("feed.xml"), xml)?;
        Ok(())
    }

    /// Publish a batch of approved drafts. One draft failing to write does
    /// not abort the rest; its error is collected and its topic does not
    /// advance. The derived files are regenerated once at the end.
    pub fn run(&self, approved: &[DraftArticle]) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        for draft in approved {
            match self.publish_article(draft) {
                Ok(path) => {
                    // Stub failures are cosmetic, artifact + status stay valid.
                    if let Err(e) = self.write_video_script_stub(draft) {
                        error!("Failed to write video script stub for {}: {}", draft.slug, e);
                    }
                    info!("Published {}", path.display());
                    report.published_paths.push(path);
                    report.published_topic_ids.push(draft.topic_id.clone());
                }
                Err(e) => {
                    error!("Failed to publish {}: {}", draft.slug, e);
                    report
                        .errors
                        .push(format!("publish failed for {}: {}", draft.slug, e));
                }
            }
        }

        let posts = self.load_posts_metadata()?;
        self.update_index(&posts)?;
        self.update_sitemap(&posts)?;
        self.update_rss(&posts)?;
        Ok(report)
    }
}

fn extract_title(html: &str) -> Option<String> {
    let start = html.find("<title>")? + "<title>".len();
    let end = html[start..].find("</title>")? + start;
    Some(html[start..end].trim().to_string())
}
