use crate::config::{Category, ChannelMetadata};
use crate::error::Result;
use crate::models::FeedEpisode;
use crate::xml::{self, Element, RenderOptions};

pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

/// Map one episode to its `<item>` tree.
pub fn item_element(episode: &FeedEpisode) -> Element {
    Element::parent(
        "item",
        vec![
            Element::cdata("title", &episode.title),
            Element::text("itunes:author", &episode.author),
            Element::cdata("itunes:subtitle", &episode.subtitle),
            Element::cdata("itunes:summary", &episode.summary_html),
            Element::text("itunes:image", &episode.image_url),
            Element::text("itunes:explicit", episode.explicit.as_str()),
            Element::empty("enclosure")
                .attr("url", &episode.enclosure_url)
                .attr("length", episode.content_length.to_string())
                .attr("type", &episode.mime_type),
            Element::cdata("guid", &episode.guid),
            Element::text("pubDate", &episode.pub_date),
            Element::text("itunes:duration", &episode.duration),
            Element::cdata("link", &episode.episode_url),
        ],
    )
}

/// Assemble the full `<rss>` tree. Items are ordered by metadata file name.
pub fn feed_document(show: &ChannelMetadata, episodes: &[FeedEpisode]) -> Element {
    let mut ordered: Vec<&FeedEpisode> = episodes.iter().collect();
    ordered.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut channel = vec![
        Element::text("title", &show.title),
        Element::text("link", &show.link),
        Element::text("language", &show.language),
        Element::text("copyright", &show.copyright),
        Element::text("itunes:subtitle", &show.subtitle),
        Element::text("itunes:author", &show.author),
        Element::text("itunes:summary", &show.summary),
        Element::text("description", &show.summary),
        Element::parent(
            "itunes:owner",
            vec![
                Element::text("itunes:name", &show.owner.name),
                Element::text("itunes:email", &show.owner.email),
            ],
        ),
        Element::empty("itunes:image").attr("href", &show.artwork_url),
    ];
    channel.extend(show.categories.iter().map(category_element));
    channel.push(Element::text("itunes:explicit", show.explicit.as_str()));
    channel.extend(ordered.into_iter().map(item_element));

    Element::parent("rss", vec![Element::parent("channel", channel)])
        .attr("xmlns:itunes", ITUNES_NAMESPACE)
        .attr("version", "2.0")
}

fn category_element(category: &Category) -> Element {
    let element = if category.subcategories.is_empty() {
        Element::empty("itunes:category")
    } else {
        Element::parent(
            "itunes:category",
            category
                .subcategories
                .iter()
                .map(|sub| Element::empty("itunes:category").attr("text", sub))
                .collect(),
        )
    };
    element.attr("text", &category.text)
}

/// Render the feed as tab-indented UTF-8 XML with a declaration.
pub fn render_feed(show: &ChannelMetadata, episodes: &[FeedEpisode]) -> Result<Vec<u8>> {
    xml::render(&feed_document(show, episodes), &RenderOptions::default())
}
